use crate::config::PaypalConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// 扣款结果
#[derive(Debug, Clone, PartialEq)]
pub struct PaypalCapture {
    pub status: String,
    /// 扣款流水号，取不到时回退为订单号
    pub capture_id: String,
}

#[derive(Clone)]
pub struct PaypalClient {
    client: Client,
    config: PaypalConfig,
}

/// 最小货币单位转 PayPal 金额字符串，1999 -> "19.99"
pub fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

impl PaypalClient {
    pub fn new(config: PaypalConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> AppResult<String> {
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(AppError::InternalError(
                "PayPal credentials are not configured".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "PayPal token request failed: HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    pub async fn create_order(&self, amount: i64, currency: &str) -> AppResult<Value> {
        let token = self.access_token().await?;
        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": currency,
                    "value": format_minor_units(amount),
                }
            }]
        });

        let response = self
            .client
            .post(self.url("/v2/checkout/orders"))
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .header("PayPal-Request-Id", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(AppError::ExternalApiError(format!(
                "PayPal order creation failed: HTTP {}: {}",
                status.as_u16(),
                error_text
            )))
        }
    }

    pub async fn capture_order(&self, order_id: &str) -> AppResult<PaypalCapture> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.url(&format!("/v2/checkout/orders/{}/capture", order_id)))
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "PayPal capture failed: HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: Value = response.json().await?;
        Ok(parse_capture(&body, order_id))
    }
}

fn parse_capture(body: &Value, order_id: &str) -> PaypalCapture {
    let status = body["status"].as_str().unwrap_or_default().to_string();
    let capture_id = body["purchase_units"][0]["payments"]["captures"][0]["id"]
        .as_str()
        .or_else(|| body["id"].as_str())
        .unwrap_or(order_id)
        .to_string();
    PaypalCapture { status, capture_id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minor_units() {
        assert_eq!(format_minor_units(1999), "19.99");
        assert_eq!(format_minor_units(500), "5.00");
        assert_eq!(format_minor_units(7), "0.07");
    }

    #[test]
    fn test_parse_capture_prefers_capture_id() {
        let body = json!({
            "id": "ORDER-1",
            "status": "COMPLETED",
            "purchase_units": [{"payments": {"captures": [{"id": "CAP-9"}]}}]
        });
        let capture = parse_capture(&body, "ORDER-1");
        assert_eq!(capture.status, "COMPLETED");
        assert_eq!(capture.capture_id, "CAP-9");

        let pending = parse_capture(&json!({"status": "PAYER_ACTION_REQUIRED"}), "ORDER-2");
        assert_eq!(pending.capture_id, "ORDER-2");
    }
}
