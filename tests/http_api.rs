mod common;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use common::*;
use cosmic_backend::config::{PaypalConfig, RazorpayConfig};
use cosmic_backend::entities::{Role, wallet_transaction_entity as wallet_txs};
use cosmic_backend::external::{PaypalClient, RazorpayClient};
use cosmic_backend::handlers;
use cosmic_backend::middlewares::AuthMiddleware;
use cosmic_backend::services::{PaymentService, ShopService, WalletService};
use cosmic_backend::utils::{JwtService, hmac_sha256_hex};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

const RAZORPAY_SECRET: &str = "s";

fn jwt() -> JwtService {
    JwtService::new("http-test-secret", 3600, 86_400)
}

fn status_of<B>(result: Result<ServiceResponse<B>, actix_web::Error>) -> StatusCode {
    match result {
        Ok(res) => res.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}

fn bearer(id: i64, role: Role, email: &str) -> (&'static str, String) {
    let token = jwt().generate_access_token(id, role, email).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

fn razorpay_payload(signature: &str, amount: i64) -> Value {
    json!({
        "order_id": "o1",
        "payment_id": "p1",
        "signature": signature,
        "amount": amount
    })
}

macro_rules! init_app {
    ($db:expr) => {{
        let wallet_service = WalletService::new($db.clone());
        let payment_service = PaymentService::new(
            wallet_service.clone(),
            RazorpayClient::new(RazorpayConfig {
                key_secret: RAZORPAY_SECRET.to_string(),
                ..RazorpayConfig::default()
            }),
            PaypalClient::new(PaypalConfig::default()),
        );
        test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt()))
                .app_data(web::Data::new(wallet_service))
                .app_data(web::Data::new(payment_service))
                .app_data(web::Data::new(ShopService::new($db.clone())))
                .configure(handlers::wallet_config)
                .configure(handlers::payment_config)
                .configure(handlers::shop_config),
        )
        .await
    }};
}

#[actix_web::test]
async fn pricing_is_public() {
    let db = setup_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/payment/pricing?plan=PREMIUM&international=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["plan"], "PREMIUM");
    assert_eq!(body["data"]["currency"], "USD");
    assert_eq!(body["data"]["reports"]["milan"], 2100);
}

#[actix_web::test]
async fn wallet_requires_token() {
    let db = setup_db().await;
    let app = init_app!(db);

    let req = test::TestRequest::get().uri("/wallet").to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wallet_is_created_for_authenticated_user() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("http@example.com")).await;
    let token = jwt()
        .generate_access_token(user.id, Role::User, &user.email)
        .unwrap();
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["balance"], 0);
    assert_eq!(body["data"]["user_id"], user.id);
}

#[actix_web::test]
async fn admin_routes_reject_regular_users() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("plain@example.com")).await;
    let token = jwt()
        .generate_access_token(user.id, Role::User, &user.email)
        .unwrap();
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/wallet/admin/all")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::FORBIDDEN);

    let admin_token = jwt()
        .generate_access_token(999, Role::Admin, "admin@example.com")
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/wallet/admin/all")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::OK);
}

#[actix_web::test]
async fn refresh_token_cannot_access_routes() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("refresh@example.com")).await;
    let refresh = jwt()
        .generate_refresh_token(user.id, Role::User, &user.email)
        .unwrap();
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(("Authorization", format!("Bearer {}", refresh)))
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn razorpay_verify_with_bad_signature_moves_no_money() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("badsig@example.com")).await;
    insert_user_wallet(&db, user.id, 1000).await;
    let app = init_app!(db);

    let req = test::TestRequest::post()
        .uri("/payment/razorpay/verify")
        .insert_header(bearer(user.id, Role::User, &user.email))
        .set_json(razorpay_payload("deadbeef", 50_000))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["data"]["message"], "Invalid signature");

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(bearer(user.id, Role::User, &user.email))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["balance"], 1000);
    assert_eq!(wallet_txs::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn razorpay_verify_credits_exact_amount() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("goodsig@example.com")).await;
    insert_user_wallet(&db, user.id, 1000).await;
    let app = init_app!(db);

    let signature = hmac_sha256_hex(RAZORPAY_SECRET, "o1|p1");
    let req = test::TestRequest::post()
        .uri("/payment/razorpay/verify")
        .insert_header(bearer(user.id, Role::User, &user.email))
        .set_json(razorpay_payload(&signature, 50_000))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["success"], true);

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(bearer(user.id, Role::User, &user.email))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["balance"], 51_000);
    let txs = body["data"]["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0]["transaction_type"], "CREDIT");
    assert_eq!(txs[0]["provider"], "RAZORPAY");
    assert_eq!(txs[0]["amount"], 50_000);
    assert_eq!(txs[0]["currency"], "INR");
    assert_eq!(txs[0]["payment_id"], "p1");
    assert_eq!(txs[0]["order_id"], "o1");
}

#[actix_web::test]
async fn astrologer_top_up_lands_in_own_wallet() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("same-id-user@example.com")).await;
    let astrologer = insert_astrologer(&db, "same-id-astro@example.com", true, false).await;
    assert_eq!(user.id, astrologer.id);
    let app = init_app!(db);

    let signature = hmac_sha256_hex(RAZORPAY_SECRET, "o1|p1");
    let req = test::TestRequest::post()
        .uri("/payment/razorpay/verify")
        .insert_header(bearer(astrologer.id, Role::Astrologer, &astrologer.email))
        .set_json(razorpay_payload(&signature, 50_000))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["success"], true);

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(bearer(astrologer.id, Role::Astrologer, &astrologer.email))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["balance"], 50_000);
    assert_eq!(body["data"]["astrologer_id"], astrologer.id);
    assert_eq!(body["data"]["user_id"], Value::Null);

    let req = test::TestRequest::get()
        .uri("/wallet")
        .insert_header(bearer(user.id, Role::User, &user.email))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["balance"], 0);
    assert_eq!(body["data"]["user_id"], user.id);
}

#[actix_web::test]
async fn shop_orders_are_for_user_accounts() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("shopper@example.com")).await;
    let astrologer = insert_astrologer(&db, "no-shop@example.com", true, false).await;
    let app = init_app!(db);

    let req = test::TestRequest::get()
        .uri("/shop/orders")
        .insert_header(bearer(astrologer.id, Role::Astrologer, &astrologer.email))
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/shop/orders")
        .insert_header(bearer(astrologer.id, Role::Astrologer, &astrologer.email))
        .set_json(json!({ "items": [{ "product_id": 1, "quantity": 1 }], "shipping_address": "x" }))
        .to_request();
    assert_eq!(status_of(test::try_call_service(&app, req).await), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/shop/orders")
        .insert_header(bearer(user.id, Role::User, &user.email))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([]));
}
