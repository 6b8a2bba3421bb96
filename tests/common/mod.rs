#![allow(dead_code)]

use chrono::Utc;
use cosmic_backend::entities::{
    Plan, Role, astrologer_entity as astrologers, user_entity as users, wallet_entity as wallets,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

pub const TEST_PASSWORD: &str = "secret123";

/// 内存 SQLite，单连接保证所有查询看到同一个库
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

fn fast_hash(password: &str) -> String {
    bcrypt::hash(password, 4).expect("hash password")
}

pub struct UserSeed<'a> {
    pub email: &'a str,
    pub role: Role,
    pub plan: Plan,
    pub country: &'a str,
    pub is_new_user: bool,
    pub free_consultation_used: bool,
}

impl<'a> UserSeed<'a> {
    pub fn new(email: &'a str) -> Self {
        Self {
            email,
            role: Role::User,
            plan: Plan::Basic,
            country: "India",
            is_new_user: true,
            free_consultation_used: false,
        }
    }

    /// 已用过免费体验的老用户
    pub fn returning(email: &'a str) -> Self {
        Self {
            is_new_user: false,
            free_consultation_used: true,
            ..Self::new(email)
        }
    }
}

pub async fn insert_user(db: &DatabaseConnection, seed: UserSeed<'_>) -> users::Model {
    let now = Utc::now();
    users::ActiveModel {
        name: Set("Test User".to_string()),
        email: Set(seed.email.to_string()),
        phone: Set(None),
        password_hash: Set(fast_hash(TEST_PASSWORD)),
        role: Set(seed.role),
        country: Set(seed.country.to_string()),
        plan: Set(seed.plan),
        is_new_user: Set(seed.is_new_user),
        free_consultation_used: Set(seed.free_consultation_used),
        bio: Set(None),
        date_of_birth: Set(None),
        place_of_birth: Set(None),
        profile_image: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn insert_astrologer(
    db: &DatabaseConnection,
    email: &str,
    is_approved: bool,
    is_blocked: bool,
) -> astrologers::Model {
    let now = Utc::now();
    astrologers::ActiveModel {
        name: Set("Pandit Test".to_string()),
        original_name: Set(Some("Ramesh Kumar".to_string())),
        is_real_name_visible: Set(false),
        email: Set(email.to_string()),
        phone: Set(None),
        password_hash: Set(fast_hash(TEST_PASSWORD)),
        profile_image: Set(None),
        bio: Set(None),
        expertise: Set("Vedic".to_string()),
        languages: Set("Hindi, English".to_string()),
        experience: Set(5),
        experience_desc: Set(None),
        age: Set(None),
        address: Set(None),
        price_per_min: Set(if is_approved { 2000 } else { 0 }),
        quoted_rate: Set(None),
        rating: Set(0.0),
        is_online: Set(false),
        is_approved: Set(is_approved),
        is_blocked: Set(is_blocked),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert astrologer")
}

pub async fn insert_user_wallet(db: &DatabaseConnection, user_id: i64, balance: i64) -> wallets::Model {
    let now = Utc::now();
    wallets::ActiveModel {
        user_id: Set(Some(user_id)),
        astrologer_id: Set(None),
        balance: Set(balance),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert wallet")
}
