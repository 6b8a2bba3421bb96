mod common;

use common::*;
use cosmic_backend::config::AdminConfig;
use cosmic_backend::entities::{Plan, Role};
use cosmic_backend::error::AppError;
use cosmic_backend::models::{CreateReviewRequest, LoginRequest, SignupRequest};
use cosmic_backend::services::{AstrologerService, AuthService};
use cosmic_backend::utils::JwtService;

fn jwt() -> JwtService {
    JwtService::new("test-secret", 3600, 86_400)
}

fn signup(email: &str, role: Option<&str>) -> SignupRequest {
    SignupRequest {
        name: "Meera".to_string(),
        email: email.to_string(),
        phone: None,
        password: TEST_PASSWORD.to_string(),
        role: role.map(str::to_string),
        country: None,
    }
}

#[tokio::test]
async fn user_signup_defaults_and_login() {
    let db = setup_db().await;
    let auth = AuthService::new(db.clone(), jwt());

    let created = auth.signup(signup("Meera@Example.com", None)).await.unwrap();
    assert_eq!(created.user.role, Role::User);
    assert_eq!(created.user.email, "meera@example.com");

    let profile = auth.get_profile(created.user.id).await.unwrap();
    assert_eq!(profile.country, "India");
    assert_eq!(profile.plan, Plan::Basic);
    assert!(profile.is_new_user);
    assert!(!profile.free_consultation_used);

    let logged_in = auth
        .login(LoginRequest {
            email: "meera@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.user.id, created.user.id);

    let refreshed = auth.refresh(&logged_in.refresh_token).await.unwrap();
    assert_eq!(refreshed.user.id, created.user.id);
    // 访问令牌不能当刷新令牌用
    assert!(auth.refresh(&logged_in.access_token).await.is_err());
}

#[tokio::test]
async fn duplicate_email_conflicts_and_bad_password_fails() {
    let db = setup_db().await;
    insert_user(&db, UserSeed::new("taken@example.com")).await;
    let auth = AuthService::new(db.clone(), jwt());

    let err = auth.signup(signup("taken@example.com", None)).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth
        .login(LoginRequest {
            email: "taken@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));
}

#[tokio::test]
async fn email_is_unique_across_users_and_astrologers() {
    let db = setup_db().await;
    insert_user(&db, UserSeed::new("shared@example.com")).await;
    insert_astrologer(&db, "guru-taken@example.com", true, false).await;
    let auth = AuthService::new(db.clone(), jwt());

    let err = auth
        .signup(signup("Shared@Example.com", Some("ASTROLOGER")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth
        .signup(signup("guru-taken@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn astrologer_signup_is_pending_until_approved() {
    let db = setup_db().await;
    let auth = AuthService::new(db.clone(), jwt());
    let directory = AstrologerService::new(db.clone());

    let created = auth
        .signup(signup("guru@example.com", Some("ASTROLOGER")))
        .await
        .unwrap();
    assert_eq!(created.user.role, Role::Astrologer);
    assert!(directory.list_public().await.unwrap().is_empty());
    assert!(matches!(
        directory.get_public(created.user.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let approved = directory.approve(created.user.id, 2500).await.unwrap();
    assert!(approved.is_approved);
    assert_eq!(approved.price_per_min, 2500);
    assert_eq!(directory.list_public().await.unwrap().len(), 1);

    directory.set_blocked(created.user.id, true).await.unwrap();
    assert!(directory.list_public().await.unwrap().is_empty());

    let login = auth
        .login(LoginRequest {
            email: "guru@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.user.role, Role::Astrologer);
}

#[tokio::test]
async fn admin_signup_is_not_self_service() {
    let db = setup_db().await;
    let auth = AuthService::new(db.clone(), jwt());

    let created = auth.signup(signup("boss@example.com", Some("ADMIN"))).await.unwrap();
    assert_eq!(created.user.role, Role::User);
}

#[tokio::test]
async fn admin_bootstrap_is_idempotent() {
    let db = setup_db().await;
    let auth = AuthService::new(db.clone(), jwt());
    let config = AdminConfig {
        email: Some("admin@example.com".to_string()),
        password: Some("admin-pass".to_string()),
        name: None,
    };

    let first = auth.ensure_admin(&config).await.unwrap();
    let second = auth.ensure_admin(&config).await.unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(auth.ensure_admin(&AdminConfig::default()).await.unwrap(), None);
}

#[tokio::test]
async fn reviews_update_average_rating() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("fan@example.com")).await;
    let astrologer = insert_astrologer(&db, "star@example.com", true, false).await;
    let directory = AstrologerService::new(db.clone());

    for rating in [5, 4, 4] {
        directory
            .add_review(
                astrologer.id,
                user.id,
                CreateReviewRequest {
                    rating,
                    comment: Some("Helpful".to_string()),
                },
            )
            .await
            .unwrap();
    }

    let detail = directory.get_public(astrologer.id).await.unwrap();
    assert_eq!(detail.reviews.len(), 3);
    assert_eq!(detail.astrologer.rating, 4.33);
    // 未允许显示真名
    assert_eq!(detail.astrologer.original_name, None);

    let err = directory
        .add_review(
            astrologer.id,
            user.id,
            CreateReviewRequest {
                rating: 6,
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
