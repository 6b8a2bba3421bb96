use crate::config::CloudinaryConfig;
use crate::error::{AppError, AppResult};
use crate::models::UploadSignatureResponse;
use crate::utils::sha256_hex;
use chrono::Utc;
use futures_util::future::try_join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 服务端上传时的缩放与压缩参数
const UPLOAD_TRANSFORMATION: &str = "c_limit,h_1000,w_1000/q_auto/f_auto";

#[derive(Debug, Deserialize)]
struct UploadResult {
    secure_url: String,
}

/// 图床：直传签名与服务端上传
#[derive(Clone)]
pub struct UploadService {
    client: Client,
    config: CloudinaryConfig,
}

impl UploadService {
    pub fn new(config: CloudinaryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    pub fn signature(&self) -> AppResult<UploadSignatureResponse> {
        self.signature_at(Utc::now().timestamp())
    }

    fn signature_at(&self, timestamp: i64) -> AppResult<UploadSignatureResponse> {
        self.ensure_configured()?;
        let c = &self.config;
        let timestamp_str = timestamp.to_string();
        Ok(UploadSignatureResponse {
            signature: self.sign(&[("folder", &c.folder), ("timestamp", &timestamp_str)]),
            timestamp,
            folder: c.folder.clone(),
            cloud_name: c.cloud_name.clone(),
            api_key: c.api_key.clone(),
        })
    }

    /// 上传一张 base64 / data URI 图片，返回 https 地址
    pub async fn upload_image(&self, image: &str) -> AppResult<String> {
        let form = self.upload_form(image, Utc::now().timestamp())?;
        let url = format!(
            "{}/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        );

        let response = self.client.post(url).form(&form).send().await?;

        if response.status().is_success() {
            let result: UploadResult = response.json().await?;
            log::info!("Image uploaded: {}", result.secure_url);
            Ok(result.secure_url)
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Image upload failed: HTTP {}: {}",
                status.as_u16(),
                error_text
            )))
        }
    }

    /// 并发上传多张，任意一张失败则整体失败
    pub async fn upload_images(&self, images: &[String]) -> AppResult<Vec<String>> {
        try_join_all(images.iter().map(|image| self.upload_image(image))).await
    }

    fn upload_form(&self, image: &str, timestamp: i64) -> AppResult<Vec<(&'static str, String)>> {
        self.ensure_configured()?;
        if image.trim().is_empty() {
            return Err(AppError::ValidationError("Image is required".to_string()));
        }

        let c = &self.config;
        let timestamp = timestamp.to_string();
        let signature = self.sign(&[
            ("folder", &c.folder),
            ("timestamp", &timestamp),
            ("transformation", UPLOAD_TRANSFORMATION),
        ]);
        Ok(vec![
            ("file", image.to_string()),
            ("api_key", c.api_key.clone()),
            ("folder", c.folder.clone()),
            ("timestamp", timestamp),
            ("transformation", UPLOAD_TRANSFORMATION.to_string()),
            ("signature", signature),
        ])
    }

    fn ensure_configured(&self) -> AppResult<()> {
        let c = &self.config;
        if c.cloud_name.is_empty() || c.api_key.is_empty() || c.api_secret.is_empty() {
            return Err(AppError::InternalError(
                "Image upload is not configured".to_string(),
            ));
        }
        Ok(())
    }

    /// 参数须按字母序传入，拼接后追加密钥
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let joined = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        sha256_hex(&format!("{}{}", joined, self.config.api_secret))
    }
}
