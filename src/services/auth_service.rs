use crate::config::AdminConfig;
use crate::entities::{Plan, Role, astrologer_entity as astrologers, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{
    AccountSummary, AuthResponse, LoginRequest, SignupRequest, UpdateUserProfileRequest,
    UserProfileResponse,
};
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

pub const DEFAULT_COUNTRY: &str = "India";

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    fn issue_tokens(&self, account: AccountSummary) -> AppResult<AuthResponse> {
        let access_token =
            self.jwt_service
                .generate_access_token(account.id, account.role, &account.email)?;
        let refresh_token =
            self.jwt_service
                .generate_refresh_token(account.id, account.role, &account.email)?;
        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: account,
        })
    }

    /// 注册：role 为 ASTROLOGER 时建占星师账号（待审核、费率为 0），
    /// 其余一律为普通用户，ADMIN 不能自助注册
    pub async fn signup(&self, request: SignupRequest) -> AppResult<AuthResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".to_string()));
        }
        let email = normalize_email(&request.email);
        if !email.contains('@') {
            return Err(AppError::ValidationError("Invalid email".to_string()));
        }
        validate_password(&request.password)?;
        let phone = non_empty(request.phone);

        let wants_astrologer = request
            .role
            .as_deref()
            .and_then(Role::parse)
            .is_some_and(|r| r == Role::Astrologer);

        // 登录按邮箱依次查两张表，邮箱须在两张表间唯一
        if self.email_registered(&email).await? {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let now = Utc::now();

        let account = if wants_astrologer {
            let mut cond = Condition::any().add(astrologers::Column::Email.eq(email.clone()));
            if let Some(p) = &phone {
                cond = cond.add(astrologers::Column::Phone.eq(p.clone()));
            }
            if astrologers::Entity::find()
                .filter(cond)
                .one(&self.pool)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(
                    "Astrologer with this email or phone already exists".to_string(),
                ));
            }

            let created = astrologers::ActiveModel {
                name: Set(name.clone()),
                original_name: Set(Some(name)),
                is_real_name_visible: Set(false),
                email: Set(email),
                phone: Set(phone),
                password_hash: Set(password_hash),
                expertise: Set(String::new()),
                languages: Set(String::new()),
                experience: Set(0),
                price_per_min: Set(0),
                rating: Set(0.0),
                is_online: Set(false),
                is_approved: Set(false),
                is_blocked: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;

            log::info!("Astrologer {} signed up, pending approval", created.id);
            AccountSummary {
                id: created.id,
                name: created.name,
                email: created.email,
                phone: created.phone,
                role: Role::Astrologer,
            }
        } else {
            let mut cond = Condition::any().add(users::Column::Email.eq(email.clone()));
            if let Some(p) = &phone {
                cond = cond.add(users::Column::Phone.eq(p.clone()));
            }
            if users::Entity::find()
                .filter(cond)
                .one(&self.pool)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(
                    "User with this email or phone already exists".to_string(),
                ));
            }

            let country =
                non_empty(request.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string());
            let created = users::ActiveModel {
                name: Set(name),
                email: Set(email),
                phone: Set(phone),
                password_hash: Set(password_hash),
                role: Set(Role::User),
                country: Set(country),
                plan: Set(Plan::Basic),
                is_new_user: Set(true),
                free_consultation_used: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;

            log::info!("User {} signed up", created.id);
            AccountSummary {
                id: created.id,
                name: created.name,
                email: created.email,
                phone: created.phone,
                role: created.role,
            }
        };

        self.issue_tokens(account)
    }

    async fn email_registered(&self, email: &str) -> AppResult<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?;
        if user.is_some() {
            return Ok(true);
        }
        let astrologer = astrologers::Entity::find()
            .filter(astrologers::Column::Email.eq(email))
            .one(&self.pool)
            .await?;
        Ok(astrologer.is_some())
    }

    /// 登录：先查用户表，再查占星师表
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);
        let invalid = || AppError::AuthError("Invalid credentials".to_string());

        let (account, password_hash) = if let Some(user) = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?
        {
            (
                AccountSummary {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    phone: user.phone,
                    role: user.role,
                },
                user.password_hash,
            )
        } else if let Some(astrologer) = astrologers::Entity::find()
            .filter(astrologers::Column::Email.eq(email))
            .one(&self.pool)
            .await?
        {
            (
                AccountSummary {
                    id: astrologer.id,
                    name: astrologer.name,
                    email: astrologer.email,
                    phone: astrologer.phone,
                    role: Role::Astrologer,
                },
                astrologer.password_hash,
            )
        } else {
            return Err(invalid());
        };

        if !verify_password(&request.password, &password_hash)? {
            return Err(invalid());
        }

        self.issue_tokens(account)
    }

    /// 用刷新令牌换新的访问令牌，刷新令牌原样返回
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let id = claims.account_id()?;

        let account = match claims.role {
            Role::Astrologer => {
                let a = astrologers::Entity::find_by_id(id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::AuthError("Account no longer exists".to_string()))?;
                AccountSummary {
                    id: a.id,
                    name: a.name,
                    email: a.email,
                    phone: a.phone,
                    role: Role::Astrologer,
                }
            }
            Role::User | Role::Admin => {
                let u = users::Entity::find_by_id(id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::AuthError("Account no longer exists".to_string()))?;
                AccountSummary {
                    id: u.id,
                    name: u.name,
                    email: u.email,
                    phone: u.phone,
                    role: u.role,
                }
            }
        };

        let access_token =
            self.jwt_service
                .generate_access_token(account.id, account.role, &account.email)?;
        Ok(AuthResponse {
            access_token,
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
            user: account,
        })
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserProfileResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateUserProfileRequest,
    ) -> AppResult<UserProfileResponse> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut am = user.into_active_model();

        if let Some(name) = non_empty(request.name) {
            am.name = Set(name);
        }
        if let Some(phone) = non_empty(request.phone) {
            let taken = users::Entity::find()
                .filter(users::Column::Phone.eq(phone.clone()))
                .filter(users::Column::Id.ne(user_id))
                .one(&self.pool)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Phone already in use".to_string()));
            }
            am.phone = Set(Some(phone));
        }
        if let Some(bio) = request.bio {
            am.bio = Set(Some(bio));
        }
        if let Some(dob) = non_empty(request.date_of_birth) {
            chrono::NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(|_| {
                AppError::ValidationError("date_of_birth must be YYYY-MM-DD".to_string())
            })?;
            am.date_of_birth = Set(Some(dob));
        }
        if let Some(place) = request.place_of_birth {
            am.place_of_birth = Set(Some(place));
        }
        if let Some(image) = request.profile_image {
            am.profile_image = Set(Some(image));
        }
        if let Some(country) = non_empty(request.country) {
            am.country = Set(country);
        }
        am.updated_at = Set(Utc::now());

        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// 按配置创建管理员账号（已存在则跳过），返回管理员 id
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<Option<i64>> {
        let (Some(email), Some(password)) = (admin.email.as_deref(), admin.password.as_deref())
        else {
            return Ok(None);
        };
        let email = normalize_email(email);

        if let Some(existing) = users::Entity::find()
            .filter(users::Column::Email.eq(email.clone()))
            .one(&self.pool)
            .await?
        {
            if existing.role != Role::Admin {
                log::warn!(
                    "Configured admin email {} belongs to a non-admin account",
                    email
                );
                return Ok(None);
            }
            return Ok(Some(existing.id));
        }

        validate_password(password)?;
        let now = Utc::now();
        let created = users::ActiveModel {
            name: Set(admin.name.clone().unwrap_or_else(|| "Administrator".to_string())),
            email: Set(email),
            phone: Set(None),
            password_hash: Set(hash_password(password)?),
            role: Set(Role::Admin),
            country: Set(DEFAULT_COUNTRY.to_string()),
            plan: Set(Plan::Basic),
            is_new_user: Set(false),
            free_consultation_used: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Admin account {} created", created.id);
        Ok(Some(created.id))
    }
}
