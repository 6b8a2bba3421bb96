use crate::entities::{ConsultationType, consultation_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StartConsultationRequest {
    #[serde(alias = "astrologerId")]
    pub astrologer_id: i64,
    #[serde(rename = "type", alias = "consultation_type")]
    pub consultation_type: ConsultationType,
}

/// 开始咨询前的报价，不预留任何余额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsultationQuote {
    pub is_free: bool,
    pub minutes_remaining: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_per_min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EndConsultationRequest {
    #[serde(alias = "astrologerId")]
    pub astrologer_id: i64,
    #[serde(rename = "type", alias = "consultation_type", default)]
    pub consultation_type: Option<ConsultationType>,
    #[serde(alias = "durationMin")]
    pub duration_min: i32,
    /// 由客户端按实际时长计算后上报
    #[serde(alias = "amountCharged")]
    pub amount_charged: i64,
    /// 客户端生成的结算幂等键，重复提交返回已有记录
    #[serde(alias = "idempotencyKey", default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsultationResponse {
    pub id: i64,
    pub user_id: i64,
    pub astrologer_id: i64,
    pub consultation_type: ConsultationType,
    pub duration_min: i32,
    pub amount_charged: i64,
    pub is_free: bool,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<consultation_entity::Model> for ConsultationResponse {
    fn from(m: consultation_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            astrologer_id: m.astrologer_id,
            consultation_type: m.consultation_type,
            duration_min: m.duration_min,
            amount_charged: m.amount_charged,
            is_free: m.is_free,
            idempotency_key: m.idempotency_key,
            created_at: m.created_at,
        }
    }
}
