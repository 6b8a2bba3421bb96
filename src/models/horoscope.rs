use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RashiReading {
    pub name: String,
    pub name_hindi: String,
    pub symbol: String,
    pub date_range: String,
    pub prediction: String,
    pub lucky_color: String,
    pub lucky_number: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegenerateResponse {
    pub success: bool,
}
