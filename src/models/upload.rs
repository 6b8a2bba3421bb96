use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 前端直传图床所需的签名参数
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadSignatureResponse {
    pub signature: String,
    pub timestamp: i64,
    pub folder: String,
    pub cloud_name: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImageRequest {
    /// base64 或 data URI
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImagesRequest {
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImagesResponse {
    pub urls: Vec<String>,
}
