use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingRegistrations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingRegistrations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::Email)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingRegistrations::PhoneNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingRegistrations::Code).string().not_null())
                    .col(
                        ColumnDef::new(PendingRegistrations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingRegistrations::Profile).json_binary())
                    .col(
                        ColumnDef::new(PendingRegistrations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One live code per email.
        manager
            .create_index(
                Index::create()
                    .table(PendingRegistrations::Table)
                    .col(PendingRegistrations::Email)
                    .name("uq_pending_registrations_email")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingRegistrations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PendingRegistrations {
    Table,
    Id,
    Email,
    PhoneNumber,
    Code,
    ExpiresAt,
    Profile,
    CreatedAt,
}
