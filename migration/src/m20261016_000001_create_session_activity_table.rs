use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionActivity::Table)
                    .if_not_exists()
                    .col(string(SessionActivity::SessionId).primary_key())
                    .col(big_integer(SessionActivity::Views))
                    .col(string_null(SessionActivity::UserId))
                    .col(timestamp_with_time_zone(SessionActivity::CreatedAt))
                    .col(timestamp_with_time_zone(SessionActivity::LastSeenAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionActivity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SessionActivity {
    Table,
    SessionId,
    Views,
    UserId,
    CreatedAt,
    LastSeenAt,
}
