use crate::entities::{
    ConsultationType, astrologer_entity as astrologers, consultation_entity as consultations,
    user_entity as users, wallet_entity as wallets,
};
use crate::error::{AppError, AppResult};
use crate::models::{ConsultationQuote, ConsultationResponse, EndConsultationRequest};
use crate::services::pricing::{free_minutes, is_international, rate_per_minute};
use crate::services::wallet_service::{WalletOwner, debit_unchecked, find_or_create_wallet};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct ConsultationService {
    pool: DatabaseConnection,
}

impl ConsultationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 开始咨询：返回报价，不改动钱包
    ///
    /// 新用户首单免费；否则按套餐与地区计费，余额不足一分钟时拒绝。
    pub async fn start(
        &self,
        user_id: i64,
        astrologer_id: i64,
        consultation_type: ConsultationType,
    ) -> AppResult<ConsultationQuote> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        astrologers::Entity::find_by_id(astrologer_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Astrologer not found".to_string()))?;

        if user.is_new_user && !user.free_consultation_used {
            let minutes = free_minutes(consultation_type);
            let kind = consultation_type.to_string().to_lowercase();
            return Ok(ConsultationQuote {
                is_free: true,
                minutes_remaining: minutes,
                rate_per_min: None,
                balance: None,
                message: Some(format!(
                    "Your first {} is free for {} minutes!",
                    kind, minutes
                )),
            });
        }

        let rate = rate_per_minute(user.plan, is_international(&user.country));
        let balance = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .map(|w| w.balance)
            .unwrap_or(0);

        if balance <= 0 {
            return Err(AppError::InsufficientBalance(
                "Insufficient balance. Please recharge your wallet.".to_string(),
            ));
        }
        let minutes_remaining = balance / rate;
        if minutes_remaining < 1 {
            return Err(AppError::InsufficientBalance(
                "Low balance. Please recharge.".to_string(),
            ));
        }

        Ok(ConsultationQuote {
            is_free: false,
            minutes_remaining,
            rate_per_min: Some(rate),
            balance: Some(balance),
            message: None,
        })
    }

    /// 结束咨询并结算，所有写入同一事务
    pub async fn end(
        &self,
        user_id: i64,
        request: EndConsultationRequest,
    ) -> AppResult<ConsultationResponse> {
        if request.duration_min < 0 {
            return Err(AppError::ValidationError(
                "duration_min cannot be negative".to_string(),
            ));
        }
        if request.amount_charged < 0 {
            return Err(AppError::ValidationError(
                "amount_charged cannot be negative".to_string(),
            ));
        }
        let idempotency_key = request
            .idempotency_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if let Some(key) = &idempotency_key {
            if let Some(existing) = self.find_settled(user_id, key).await? {
                log::info!(
                    "Consultation {} already settled for key {}",
                    existing.id,
                    key
                );
                return Ok(existing.into());
            }
        }

        let txn = self.pool.begin().await?;

        let user = users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        astrologers::Entity::find_by_id(request.astrologer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Astrologer not found".to_string()))?;

        let is_free = user.is_new_user && !user.free_consultation_used;
        let amount_charged = if is_free {
            let mut am = user.into_active_model();
            am.free_consultation_used = Set(true);
            am.is_new_user = Set(false);
            am.updated_at = Set(Utc::now());
            am.update(&txn).await?;
            0
        } else {
            let wallet = find_or_create_wallet(&txn, WalletOwner::User(user_id)).await?;
            let description = format!("Consultation with astrologer {}", request.astrologer_id);
            let balance =
                debit_unchecked(&txn, wallet.id, request.amount_charged, &description).await?;
            if balance < 0 {
                log::warn!(
                    "Wallet {} went negative ({}) after consultation settlement",
                    wallet.id,
                    balance
                );
            }
            request.amount_charged
        };

        let consultation = consultations::ActiveModel {
            user_id: Set(user_id),
            astrologer_id: Set(request.astrologer_id),
            consultation_type: Set(request.consultation_type.unwrap_or(ConsultationType::Chat)),
            duration_min: Set(request.duration_min),
            amount_charged: Set(amount_charged),
            is_free: Set(is_free),
            idempotency_key: Set(idempotency_key.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let consultation = match consultation {
            Ok(c) => c,
            Err(err) => {
                txn.rollback().await?;
                // 并发重复提交撞上 (user_id, idempotency_key) 唯一索引，返回先提交的那条
                if let Some(key) = &idempotency_key {
                    if let Some(existing) = self.find_settled(user_id, key).await? {
                        log::info!(
                            "Concurrent settlement for key {} resolved to consultation {}",
                            key,
                            existing.id
                        );
                        return Ok(existing.into());
                    }
                }
                return Err(err.into());
            }
        };

        txn.commit().await?;

        log::info!(
            "Consultation {} settled: user {} astrologer {} {} min, charged {} (free={})",
            consultation.id,
            user_id,
            consultation.astrologer_id,
            consultation.duration_min,
            consultation.amount_charged,
            consultation.is_free
        );
        Ok(consultation.into())
    }

    async fn find_settled(
        &self,
        user_id: i64,
        key: &str,
    ) -> AppResult<Option<consultations::Model>> {
        Ok(consultations::Entity::find()
            .filter(consultations::Column::UserId.eq(user_id))
            .filter(consultations::Column::IdempotencyKey.eq(key))
            .one(&self.pool)
            .await?)
    }

    /// 用户的咨询记录，新的在前
    pub async fn history(&self, user_id: i64) -> AppResult<Vec<ConsultationResponse>> {
        let list = consultations::Entity::find()
            .filter(consultations::Column::UserId.eq(user_id))
            .order_by_desc(consultations::Column::CreatedAt)
            .order_by_desc(consultations::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}
