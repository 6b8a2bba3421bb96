use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Consultations {
    Table,
    Id,
    UserId,
    AstrologerId,
    ConsultationType,
    DurationMin,
    AmountCharged,
    IsFree,
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
                    .table(Consultations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Consultations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Consultations::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Consultations::AstrologerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Consultations::ConsultationType)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Consultations::DurationMin)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Consultations::AmountCharged)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Consultations::IsFree)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Consultations::CreatedAt)
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
                    .name("idx_consultations_user")
                    .table(Consultations::Table)
                    .col(Consultations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Consultations::Table).to_owned())
            .await
    }
}
