use sea_orm_migration::prelude::*;

use crate::m20251101_000001_create_events::Events;

/// Participants (registered under exactly one event)
#[derive(DeriveIden)]
pub(crate) enum Participants {
    Table,
    Id,
    EventId,
    Name,
    Email,
    Wishlist,
    Avatar,
    SecretToken,
    PersonalPin,
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
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::EventId).uuid().not_null())
                    .col(ColumnDef::new(Participants::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Participants::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Participants::Wishlist).text().null())
                    .col(
                        ColumnDef::new(Participants::Avatar)
                            .string_len(16)
                            .not_null()
                            .default("🎅"),
                    )
                    .col(
                        ColumnDef::new(Participants::SecretToken)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::PersonalPin).string_len(4).null())
                    .col(
                        ColumnDef::new(Participants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_event")
                            .from(Participants::Table, Participants::EventId)
                            .to(Events::Table, Events::Id)
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
                    .name("idx_participants_secret_token_unique")
                    .table(Participants::Table)
                    .col(Participants::SecretToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // email is unique within an event
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_event_email_unique")
                    .table(Participants::Table)
                    .col(Participants::EventId)
                    .col(Participants::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // NULL pins never collide, so participants without a pin are unaffected
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_event_pin_unique")
                    .table(Participants::Table)
                    .col(Participants::EventId)
                    .col(Participants::PersonalPin)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_event_created")
                    .table(Participants::Table)
                    .col(Participants::EventId)
                    .col(Participants::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Participants::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
