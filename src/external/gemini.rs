use crate::config::GeminiConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

/// 生成式文本接口，只取第一条候选的文本
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    pub async fn generate_text(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> AppResult<String> {
        if !self.is_enabled() {
            return Err(AppError::InternalError(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_output_tokens,
            }
        });

        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApiError(format!(
                "Gemini API error: HTTP {}",
                status.as_u16()
            )));
        }

        let data: Value = response.json().await?;
        Ok(data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}
