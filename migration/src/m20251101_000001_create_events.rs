use sea_orm_migration::prelude::*;

/// Events (gift exchange occasions)
#[derive(DeriveIden)]
pub(crate) enum Events {
    Table,
    Id,
    Name,
    Date,
    Budget,
    Rules,
    State,
    EventCode,
    AdminSecret,
    AdminPin,
    DrawnAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// event_code / admin_secret / admin_pin are all globally unique.
/// admin_pin is only 4 digits, so the whole deployment shares 10000 values.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Events::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Events::Date).date().not_null())
                    .col(ColumnDef::new(Events::Budget).integer().null())
                    .col(ColumnDef::new(Events::Rules).text().null())
                    .col(
                        ColumnDef::new(Events::State)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(Events::EventCode).string_len(8).not_null())
                    .col(ColumnDef::new(Events::AdminSecret).string_len(32).not_null())
                    .col(ColumnDef::new(Events::AdminPin).string_len(4).not_null())
                    .col(
                        ColumnDef::new(Events::DrawnAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_event_code_unique")
                    .table(Events::Table)
                    .col(Events::EventCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_admin_secret_unique")
                    .table(Events::Table)
                    .col(Events::AdminSecret)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_admin_pin_unique")
                    .table(Events::Table)
                    .col(Events::AdminPin)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await
    }
}
