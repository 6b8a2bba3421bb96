use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Consultations {
    Table,
    UserId,
    IdempotencyKey,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Consultations::Table)
                    .add_column(
                        ColumnDef::new(Consultations::IdempotencyKey)
                            .string_len(128)
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一用户的同一结算请求只落库一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_consultations_user_idempotency")
                    .table(Consultations::Table)
                    .col(Consultations::UserId)
                    .col(Consultations::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_consultations_user_idempotency")
                    .table(Consultations::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Consultations::Table)
                    .drop_column(Consultations::IdempotencyKey)
                    .to_owned(),
            )
            .await
    }
}
