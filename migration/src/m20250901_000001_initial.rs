use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Phone,
    PasswordHash,
    Role,
    Country,
    Plan,
    IsNewUser,
    FreeConsultationUsed,
    Bio,
    DateOfBirth,
    PlaceOfBirth,
    ProfileImage,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Astrologers {
    Table,
    Id,
    Name,
    OriginalName,
    IsRealNameVisible,
    Email,
    Phone,
    PasswordHash,
    ProfileImage,
    Bio,
    Expertise,
    Languages,
    Experience,
    ExperienceDesc,
    Age,
    Address,
    PricePerMin,
    QuotedRate,
    Rating,
    IsOnline,
    IsApproved,
    IsBlocked,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Wallets {
    Table,
    Id,
    UserId,
    AstrologerId,
    Balance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WalletTransactions {
    Table,
    Id,
    WalletId,
    Amount,
    Currency,
    TransactionType,
    Status,
    Provider,
    PaymentId,
    OrderId,
    Description,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users: 普通用户与管理员
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Phone).string_len(32).null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("USER"),
                    )
                    .col(
                        ColumnDef::new(Users::Country)
                            .string_len(64)
                            .not_null()
                            .default("India"),
                    )
                    .col(
                        ColumnDef::new(Users::Plan)
                            .string_len(16)
                            .not_null()
                            .default("BASIC"),
                    )
                    .col(
                        ColumnDef::new(Users::IsNewUser)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::FreeConsultationUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::Bio).text().null())
                    .col(ColumnDef::new(Users::DateOfBirth).string_len(16).null())
                    .col(ColumnDef::new(Users::PlaceOfBirth).string_len(255).null())
                    .col(ColumnDef::new(Users::ProfileImage).string_len(512).null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // astrologers: 独立身份表，公开字段 + 私有字段
        manager
            .create_table(
                Table::create()
                    .table(Astrologers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Astrologers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Astrologers::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Astrologers::OriginalName).string_len(100).null())
                    .col(
                        ColumnDef::new(Astrologers::IsRealNameVisible)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Astrologers::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Astrologers::Phone)
                            .string_len(32)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Astrologers::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Astrologers::ProfileImage).string_len(512).null())
                    .col(ColumnDef::new(Astrologers::Bio).text().null())
                    .col(
                        ColumnDef::new(Astrologers::Expertise)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Astrologers::Languages)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Astrologers::Experience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Astrologers::ExperienceDesc).text().null())
                    .col(ColumnDef::new(Astrologers::Age).integer().null())
                    .col(ColumnDef::new(Astrologers::Address).text().null())
                    .col(
                        ColumnDef::new(Astrologers::PricePerMin)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Astrologers::QuotedRate).big_integer().null())
                    .col(
                        ColumnDef::new(Astrologers::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Astrologers::IsOnline)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Astrologers::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Astrologers::IsBlocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Astrologers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Astrologers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // wallets: 每个账户（用户或占星师）最多一个钱包
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wallets::UserId).big_integer().null().unique_key())
                    .col(
                        ColumnDef::new(Wallets::AstrologerId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Wallets::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wallets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Wallets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::WalletId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Currency)
                            .string_len(8)
                            .not_null()
                            .default("INR"),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::TransactionType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Status)
                            .string_len(16)
                            .not_null()
                            .default("COMPLETED"),
                    )
                    .col(ColumnDef::new(WalletTransactions::Provider).string_len(16).null())
                    .col(
                        ColumnDef::new(WalletTransactions::PaymentId)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(WalletTransactions::OrderId).string_len(255).null())
                    .col(ColumnDef::new(WalletTransactions::Description).text().null())
                    .col(
                        ColumnDef::new(WalletTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallet_transactions_wallet")
                            .from(WalletTransactions::Table, WalletTransactions::WalletId)
                            .to(Wallets::Table, Wallets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wallet_transactions_wallet")
                    .table(WalletTransactions::Table)
                    .col(WalletTransactions::WalletId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(WalletTransactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Astrologers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
