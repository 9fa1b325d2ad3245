use sea_orm_migration::prelude::*;

use crate::m20251101_000001_create_events::Events;
use crate::m20251101_000002_create_participants::Participants;

/// Draws (giver -> receiver pairs of the latest draw)
#[derive(DeriveIden)]
enum Draws {
    Table,
    Id,
    EventId,
    GiverId,
    ReceiverId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Draws::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Draws::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Draws::EventId).uuid().not_null())
                    .col(ColumnDef::new(Draws::GiverId).uuid().not_null())
                    .col(ColumnDef::new(Draws::ReceiverId).uuid().not_null())
                    .col(
                        ColumnDef::new(Draws::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draws_event")
                            .from(Draws::Table, Draws::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draws_giver")
                            .from(Draws::Table, Draws::GiverId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draws_receiver")
                            .from(Draws::Table, Draws::ReceiverId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draws_giver_receiver_unique")
                    .table(Draws::Table)
                    .col(Draws::GiverId)
                    .col(Draws::ReceiverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // one pair per giver and event
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draws_event_giver_unique")
                    .table(Draws::Table)
                    .col(Draws::EventId)
                    .col(Draws::GiverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Draws::Table).if_exists().to_owned())
            .await
    }
}
