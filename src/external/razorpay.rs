use crate::config::RazorpayConfig;
use crate::error::{AppError, AppResult};
use crate::utils::verify_hmac_sha256_hex;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: String,
}

#[derive(Clone)]
pub struct RazorpayClient {
    client: Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    pub fn new(config: RazorpayConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    /// 创建订单，`amount` 已是最小货币单位（paise）
    pub async fn create_order(&self, amount: i64, currency: &str) -> AppResult<Value> {
        if self.config.key_id.is_empty() || self.config.key_secret.is_empty() {
            return Err(AppError::InternalError(
                "Razorpay credentials are not configured".to_string(),
            ));
        }

        let body = CreateOrderBody {
            amount,
            currency,
            receipt: format!("receipt_{}", Utc::now().timestamp_millis()),
        };

        let response = self
            .client
            .post(format!("{}/orders", self.config.base_url.trim_end_matches('/')))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let order: Value = response.json().await?;
            log::info!(
                "Razorpay order created: {} ({} {})",
                order["id"].as_str().unwrap_or("-"),
                amount,
                currency
            );
            Ok(order)
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Razorpay order creation failed: HTTP {}: {}",
                status.as_u16(),
                error_text
            )))
        }
    }

    /// 校验 checkout 回传的签名：HMAC_SHA256(secret, "order_id|payment_id")
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        let payload = format!("{}|{}", order_id, payment_id);
        verify_hmac_sha256_hex(&self.config.key_secret, &payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hmac_sha256_hex;

    fn client(secret: &str) -> RazorpayClient {
        RazorpayClient::new(RazorpayConfig {
            key_id: "rzp_test".to_string(),
            key_secret: secret.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_signature_over_order_and_payment() {
        let rp = client("s");
        let good = hmac_sha256_hex("s", "o1|p1");
        assert!(rp.verify_signature("o1", "p1", &good));
        assert!(!rp.verify_signature("o1", "p1", "s"));
        assert!(!rp.verify_signature("p1", "o1", &good));
    }

    #[tokio::test]
    async fn test_create_order_requires_credentials() {
        let rp = RazorpayClient::new(RazorpayConfig::default());
        let err = rp.create_order(1000, "INR").await.unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
