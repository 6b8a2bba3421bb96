use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "astrologers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub original_name: Option<String>,
    pub is_real_name_visible: bool,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
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
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub is_online: bool,
    pub is_approved: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// 公开目录只展示已审核且未封禁的占星师
    pub fn is_publicly_visible(&self) -> bool {
        self.is_approved && !self.is_blocked
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
