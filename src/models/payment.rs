use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentOrderRequest {
    /// 金额（最小货币单位）
    #[schema(example = 50000)]
    pub amount: i64,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyRazorpayRequest {
    #[serde(alias = "orderId", alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "paymentId", alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CapturePaypalRequest {
    #[serde(alias = "orderId")]
    pub order_id: String,
    pub amount: i64,
}

/// 支付确认结果；签名不符或未完成扣款时 success 为 false
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PaymentResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: Option<&str>) -> Self {
        Self {
            success: false,
            message: message.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, IntoParams)]
pub struct PricingQuery {
    /// FREEMIUM / BASIC / PREMIUM，缺省 BASIC
    pub plan: Option<String>,
    pub international: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReportPrices {
    pub personal: i64,
    pub milan: i64,
}

/// 套餐展示价（最小货币单位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlanPricing {
    pub plan: String,
    pub min_rate: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports: Option<ReportPrices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Personal,
    Milan,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportCheckoutRequest {
    #[serde(alias = "reportType")]
    pub report_type: ReportType,
    #[serde(alias = "isInternational", default)]
    pub is_international: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportCheckoutResponse {
    /// RAZORPAY / PAYPAL
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Value>,
    pub amount: i64,
    pub currency: String,
}
