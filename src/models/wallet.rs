use crate::entities::{PaymentProvider, TransactionType, wallet_entity, wallet_transaction_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletTransactionResponse {
    pub id: i64,
    pub wallet_id: i64,
    pub amount: i64,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub status: String,
    pub provider: Option<PaymentProvider>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<wallet_transaction_entity::Model> for WalletTransactionResponse {
    fn from(m: wallet_transaction_entity::Model) -> Self {
        Self {
            id: m.id,
            wallet_id: m.wallet_id,
            amount: m.amount,
            currency: m.currency,
            transaction_type: m.transaction_type,
            status: m.status,
            provider: m.provider,
            payment_id: m.payment_id,
            order_id: m.order_id,
            description: m.description,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub astrologer_id: Option<i64>,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 最近 10 条流水，新的在前
    pub transactions: Vec<WalletTransactionResponse>,
}

impl WalletResponse {
    pub fn new(wallet: wallet_entity::Model, transactions: Vec<wallet_transaction_entity::Model>) -> Self {
        Self {
            id: wallet.id,
            user_id: wallet.user_id,
            astrologer_id: wallet.astrologer_id,
            balance: wallet.balance,
            created_at: wallet.created_at,
            updated_at: wallet.updated_at,
            transactions: transactions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminWalletResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub astrologer_id: Option<i64>,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<wallet_entity::Model> for AdminWalletResponse {
    fn from(m: wallet_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            astrologer_id: m.astrologer_id,
            balance: m.balance,
            updated_at: m.updated_at,
        }
    }
}
