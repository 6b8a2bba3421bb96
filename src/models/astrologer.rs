use crate::entities::{astrologer_entity, review_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 公开目录中的占星师信息（不含联系方式与账户状态）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AstrologerPublic {
    pub id: i64,
    pub name: String,
    /// 仅在占星师允许显示真名时返回
    pub original_name: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub expertise: String,
    pub languages: String,
    pub experience: i32,
    pub experience_desc: Option<String>,
    pub age: Option<i32>,
    pub price_per_min: i64,
    pub rating: f64,
    pub is_online: bool,
}

impl From<astrologer_entity::Model> for AstrologerPublic {
    fn from(m: astrologer_entity::Model) -> Self {
        let original_name = if m.is_real_name_visible {
            m.original_name
        } else {
            None
        };
        Self {
            id: m.id,
            name: m.name,
            original_name,
            profile_image: m.profile_image,
            bio: m.bio,
            expertise: m.expertise,
            languages: m.languages,
            experience: m.experience,
            experience_desc: m.experience_desc,
            age: m.age,
            price_per_min: m.price_per_min,
            rating: m.rating,
            is_online: m.is_online,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub user_id: i64,
    pub astrologer_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<review_entity::Model> for ReviewResponse {
    fn from(m: review_entity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            astrologer_id: m.astrologer_id,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AstrologerDetail {
    #[serde(flatten)]
    pub astrologer: AstrologerPublic,
    pub reviews: Vec<ReviewResponse>,
}

/// 占星师本人或管理员可见的完整资料
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AstrologerProfile {
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub is_real_name_visible: bool,
    pub email: String,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub expertise: String,
    pub languages: String,
    pub experience: i32,
    pub experience_desc: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub price_per_min: i64,
    pub quoted_rate: Option<i64>,
    pub rating: f64,
    pub is_online: bool,
    pub is_approved: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<astrologer_entity::Model> for AstrologerProfile {
    fn from(m: astrologer_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            original_name: m.original_name,
            is_real_name_visible: m.is_real_name_visible,
            email: m.email,
            phone: m.phone,
            profile_image: m.profile_image,
            bio: m.bio,
            expertise: m.expertise,
            languages: m.languages,
            experience: m.experience,
            experience_desc: m.experience_desc,
            age: m.age,
            address: m.address,
            price_per_min: m.price_per_min,
            quoted_rate: m.quoted_rate,
            rating: m.rating,
            is_online: m.is_online,
            is_approved: m.is_approved,
            is_blocked: m.is_blocked,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 占星师自助修改资料；审核状态、封禁、评分与定价不可自改
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateAstrologerProfileRequest {
    /// 对外展示名，写入 `name`
    pub display_name: Option<String>,
    pub original_name: Option<String>,
    pub is_real_name_visible: Option<bool>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub expertise: Option<String>,
    pub languages: Option<String>,
    pub experience: Option<i32>,
    pub experience_desc: Option<String>,
    pub age: Option<i32>,
    pub address: Option<String>,
    pub quoted_rate: Option<i64>,
    pub is_online: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AstrologerAdminView {
    #[serde(flatten)]
    pub astrologer: AstrologerProfile,
    pub consultation_count: i64,
    pub review_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApproveAstrologerRequest {
    /// 核定费率（最小货币单位/分钟）
    #[schema(example = 2500)]
    pub approved_rate: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockAstrologerRequest {
    pub is_blocked: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    #[schema(example = 5)]
    pub rating: i32,
    pub comment: Option<String>,
}
