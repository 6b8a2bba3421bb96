use crate::entities::{
    PaymentProvider, Role, TransactionType, wallet_entity as wallets,
    wallet_transaction_entity as wallet_txs,
};
use crate::error::{AppError, AppResult};
use crate::middlewares::AuthUser;
use crate::models::{AdminWalletResponse, WalletResponse};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 钱包归属：普通用户或占星师
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOwner {
    User(i64),
    Astrologer(i64),
}

impl From<AuthUser> for WalletOwner {
    fn from(user: AuthUser) -> Self {
        match user.role {
            Role::Astrologer => WalletOwner::Astrologer(user.id),
            Role::User | Role::Admin => WalletOwner::User(user.id),
        }
    }
}

/// 入账参数
#[derive(Debug, Clone)]
pub struct Credit<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub provider: PaymentProvider,
    pub payment_id: Option<&'a str>,
    pub order_id: Option<&'a str>,
}

#[derive(Clone)]
pub struct WalletService {
    pool: DatabaseConnection,
}

impl WalletService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取钱包（不存在则以余额 0 创建）及最近 10 条流水
    pub async fn get_or_create(&self, owner: WalletOwner) -> AppResult<WalletResponse> {
        let wallet = find_or_create_wallet(&self.pool, owner).await?;
        let transactions = wallet_txs::Entity::find()
            .filter(wallet_txs::Column::WalletId.eq(wallet.id))
            .order_by_desc(wallet_txs::Column::CreatedAt)
            .order_by_desc(wallet_txs::Column::Id)
            .limit(10)
            .all(&self.pool)
            .await?;
        Ok(WalletResponse::new(wallet, transactions))
    }

    /// 充值入账：余额增加与 CREDIT 流水在同一事务内
    pub async fn add_funds(&self, wallet_id: i64, credit: Credit<'_>) -> AppResult<wallets::Model> {
        if credit.amount <= 0 {
            return Err(AppError::ValidationError(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(credit.amount),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(wallet_id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Wallet not found".to_string()));
        }

        wallet_txs::ActiveModel {
            wallet_id: Set(wallet_id),
            amount: Set(credit.amount),
            currency: Set(credit.currency.to_string()),
            transaction_type: Set(TransactionType::Credit),
            status: Set(wallet_txs::STATUS_COMPLETED.to_string()),
            provider: Set(Some(credit.provider)),
            payment_id: Set(credit.payment_id.map(str::to_string)),
            order_id: Set(credit.order_id.map(str::to_string)),
            description: Set(Some(format!("Added funds via {}", credit.provider))),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let wallet = load_wallet(&txn, wallet_id).await?;
        txn.commit().await?;

        log::info!(
            "Wallet {} credited {} {} via {} (balance {})",
            wallet_id,
            credit.amount,
            credit.currency,
            credit.provider,
            wallet.balance
        );
        Ok(wallet)
    }

    /// 扣款：余额不足返回 InsufficientBalance。
    /// 条件更新 `balance >= amount` 保证并发扣款不会透支。
    pub async fn deduct_funds(
        &self,
        wallet_id: i64,
        amount: i64,
        description: &str,
    ) -> AppResult<wallets::Model> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Amount must be greater than zero".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let result = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).sub(amount),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(wallets::Column::Id.eq(wallet_id))
            .filter(wallets::Column::Balance.gte(amount))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            // 区分钱包不存在与余额不足
            let exists = wallets::Entity::find_by_id(wallet_id).one(&txn).await?;
            return Err(match exists {
                None => AppError::NotFound("Wallet not found".to_string()),
                Some(_) => AppError::InsufficientBalance("Insufficient balance".to_string()),
            });
        }

        insert_debit(&txn, wallet_id, amount, description).await?;
        let wallet = load_wallet(&txn, wallet_id).await?;
        txn.commit().await?;

        log::info!(
            "Wallet {} debited {} (balance {})",
            wallet_id,
            amount,
            wallet.balance
        );
        Ok(wallet)
    }

    /// 管理后台：全部钱包
    pub async fn list_all_for_admin(&self) -> AppResult<Vec<AdminWalletResponse>> {
        let list = wallets::Entity::find()
            .order_by_desc(wallets::Column::UpdatedAt)
            .order_by_desc(wallets::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}

// -----------------------------
// 事务内可复用的辅助函数
// -----------------------------

pub(crate) async fn find_or_create_wallet<C: ConnectionTrait>(
    db: &C,
    owner: WalletOwner,
) -> Result<wallets::Model, DbErr> {
    let filter = match owner {
        WalletOwner::User(id) => wallets::Column::UserId.eq(id),
        WalletOwner::Astrologer(id) => wallets::Column::AstrologerId.eq(id),
    };

    if let Some(w) = wallets::Entity::find().filter(filter.clone()).one(db).await? {
        return Ok(w);
    }

    let now = Utc::now();
    let (user_id, astrologer_id) = match owner {
        WalletOwner::User(id) => (Some(id), None),
        WalletOwner::Astrologer(id) => (None, Some(id)),
    };
    let inserted = wallets::ActiveModel {
        user_id: Set(user_id),
        astrologer_id: Set(astrologer_id),
        balance: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(w) => Ok(w),
        // 并发创建撞上唯一约束时读回已存在的钱包
        Err(err) => match wallets::Entity::find().filter(filter).one(db).await? {
            Some(w) => Ok(w),
            None => Err(err),
        },
    }
}

async fn load_wallet<C: ConnectionTrait>(db: &C, wallet_id: i64) -> AppResult<wallets::Model> {
    wallets::Entity::find_by_id(wallet_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Wallet not found".to_string()))
}

async fn insert_debit<C: ConnectionTrait>(
    db: &C,
    wallet_id: i64,
    amount: i64,
    description: &str,
) -> Result<wallet_txs::Model, DbErr> {
    wallet_txs::ActiveModel {
        wallet_id: Set(wallet_id),
        amount: Set(amount),
        currency: Set("INR".to_string()),
        transaction_type: Set(TransactionType::Debit),
        status: Set(wallet_txs::STATUS_COMPLETED.to_string()),
        provider: Set(None),
        payment_id: Set(None),
        order_id: Set(None),
        description: Set(Some(description.to_string())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// 无条件扣款（服务已提供），返回扣款后的余额
pub(crate) async fn debit_unchecked<C: ConnectionTrait>(
    db: &C,
    wallet_id: i64,
    amount: i64,
    description: &str,
) -> AppResult<i64> {
    wallets::Entity::update_many()
        .col_expr(
            wallets::Column::Balance,
            Expr::col(wallets::Column::Balance).sub(amount),
        )
        .col_expr(wallets::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(wallets::Column::Id.eq(wallet_id))
        .exec(db)
        .await?;
    insert_debit(db, wallet_id, amount, description).await?;
    Ok(load_wallet(db, wallet_id).await?.balance)
}
