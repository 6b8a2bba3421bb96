use crate::entities::{Plan, Role, user_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "+919812345678")]
    pub phone: Option<String>,
    #[schema(example = "secret123")]
    pub password: String,
    /// `ASTROLOGER` 创建占星师账号，其余一律为普通用户
    #[schema(example = "USER")]
    pub role: Option<String>,
    #[schema(example = "India")]
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: AccountSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub country: String,
    pub plan: Plan,
    pub is_new_user: bool,
    pub free_consultation_used: bool,
    pub bio: Option<String>,
    pub date_of_birth: Option<String>,
    pub place_of_birth: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserProfileResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            role: m.role,
            country: m.country,
            plan: m.plan,
            is_new_user: m.is_new_user,
            free_consultation_used: m.free_consultation_used,
            bio: m.bio,
            date_of_birth: m.date_of_birth,
            place_of_birth: m.place_of_birth,
            profile_image: m.profile_image,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    #[schema(example = "1994-08-15")]
    pub date_of_birth: Option<String>,
    pub place_of_birth: Option<String>,
    pub profile_image: Option<String>,
    pub country: Option<String>,
}
