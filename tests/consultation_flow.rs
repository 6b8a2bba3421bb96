mod common;

use common::*;
use cosmic_backend::entities::{
    ConsultationType, Plan, TransactionType, user_entity as users, wallet_transaction_entity,
};
use cosmic_backend::error::AppError;
use cosmic_backend::models::EndConsultationRequest;
use cosmic_backend::services::{ConsultationService, WalletOwner, WalletService};
use sea_orm::{EntityTrait, PaginatorTrait};

fn end_request(astrologer_id: i64, minutes: i32, amount: i64, key: Option<&str>) -> EndConsultationRequest {
    EndConsultationRequest {
        astrologer_id,
        consultation_type: Some(ConsultationType::Chat),
        duration_min: minutes,
        amount_charged: amount,
        idempotency_key: key.map(str::to_string),
    }
}

#[tokio::test]
async fn new_user_gets_free_chat_quote_without_wallet_changes() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("c1@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca1@example.com", true, false).await;
    let service = ConsultationService::new(db.clone());

    let quote = service
        .start(user.id, astrologer.id, ConsultationType::Chat)
        .await
        .unwrap();
    assert!(quote.is_free);
    assert_eq!(quote.minutes_remaining, 5);
    assert!(quote.message.is_some());

    let call = service
        .start(user.id, astrologer.id, ConsultationType::Call)
        .await
        .unwrap();
    assert_eq!(call.minutes_remaining, 3);

    // 报价不会创建钱包或流水
    assert_eq!(cosmic_backend::entities::wallet_entity::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(wallet_transaction_entity::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn low_balance_is_rejected() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("c2@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca2@example.com", true, false).await;
    insert_user_wallet(&db, user.id, 5).await;
    let service = ConsultationService::new(db.clone());

    let err = service
        .start(user.id, astrologer.id, ConsultationType::Call)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientBalance(_)));
}

#[tokio::test]
async fn empty_wallet_is_rejected() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("c3@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca3@example.com", true, false).await;
    let service = ConsultationService::new(db.clone());

    let err = service
        .start(user.id, astrologer.id, ConsultationType::Chat)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientBalance(_)));
}

#[tokio::test]
async fn paid_quote_uses_plan_rate() {
    let db = setup_db().await;
    let mut seed = UserSeed::returning("c4@example.com");
    seed.plan = Plan::Premium;
    let user = insert_user(&db, seed).await;
    let astrologer = insert_astrologer(&db, "ca4@example.com", true, false).await;
    insert_user_wallet(&db, user.id, 25_000).await;
    let service = ConsultationService::new(db.clone());

    let quote = service
        .start(user.id, astrologer.id, ConsultationType::Chat)
        .await
        .unwrap();
    assert!(!quote.is_free);
    assert_eq!(quote.rate_per_min, Some(7000));
    assert_eq!(quote.minutes_remaining, 3);
    assert_eq!(quote.balance, Some(25_000));
}

#[tokio::test]
async fn missing_user_or_astrologer() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("c5@example.com")).await;
    let service = ConsultationService::new(db.clone());

    let err = service.start(user.id, 404, ConsultationType::Chat).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = service.start(404, 1, ConsultationType::Chat).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn ending_free_trial_consumes_it() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("c6@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca6@example.com", true, false).await;
    let service = ConsultationService::new(db.clone());

    let record = service
        .end(user.id, end_request(astrologer.id, 5, 999, None))
        .await
        .unwrap();
    assert!(record.is_free);
    assert_eq!(record.amount_charged, 0);

    let refreshed = users::Entity::find_by_id(user.id).one(&db).await.unwrap().unwrap();
    assert!(refreshed.free_consultation_used);
    assert!(!refreshed.is_new_user);
    assert_eq!(wallet_transaction_entity::Entity::find().count(&db).await.unwrap(), 0);

    // 免费体验只有一次
    let err = service
        .start(user.id, astrologer.id, ConsultationType::Chat)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientBalance(_)));
}

#[tokio::test]
async fn ending_paid_session_appends_one_debit() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("c7@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca7@example.com", true, false).await;
    insert_user_wallet(&db, user.id, 10_000).await;
    let service = ConsultationService::new(db.clone());
    let wallets = WalletService::new(db.clone());

    let record = service
        .end(user.id, end_request(astrologer.id, 4, 4000, None))
        .await
        .unwrap();
    assert!(!record.is_free);
    assert_eq!(record.amount_charged, 4000);

    let view = wallets.get_or_create(WalletOwner::User(user.id)).await.unwrap();
    assert_eq!(view.balance, 6000);
    assert_eq!(view.transactions.len(), 1);
    assert_eq!(view.transactions[0].transaction_type, TransactionType::Debit);
    assert_eq!(view.transactions[0].amount, 4000);

    let history = service.history(user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, record.id);
}

#[tokio::test]
async fn repeated_end_with_same_key_moves_money_once() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("c8@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca8@example.com", true, false).await;
    insert_user_wallet(&db, user.id, 10_000).await;
    let service = ConsultationService::new(db.clone());

    let first = service
        .end(user.id, end_request(astrologer.id, 2, 2000, Some("session-42")))
        .await
        .unwrap();
    let second = service
        .end(user.id, end_request(astrologer.id, 2, 2000, Some("session-42")))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(wallet_transaction_entity::Entity::find().count(&db).await.unwrap(), 1);
    let view = WalletService::new(db.clone())
        .get_or_create(WalletOwner::User(user.id))
        .await
        .unwrap();
    assert_eq!(view.balance, 8000);
}

#[tokio::test]
async fn concurrent_end_with_same_key_settles_once() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("c10@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca10@example.com", true, false).await;
    insert_user_wallet(&db, user.id, 10_000).await;
    let service = ConsultationService::new(db.clone());

    // 三个请求都先通过预查询，再争抢同一个唯一键
    let (a, b, c) = tokio::join!(
        service.end(user.id, end_request(astrologer.id, 3, 3000, Some("race-1"))),
        service.end(user.id, end_request(astrologer.id, 3, 3000, Some("race-1"))),
        service.end(user.id, end_request(astrologer.id, 3, 3000, Some("race-1"))),
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    assert_eq!(a.id, b.id);
    assert_eq!(a.id, c.id);
    assert_eq!(service.history(user.id).await.unwrap().len(), 1);
    assert_eq!(wallet_transaction_entity::Entity::find().count(&db).await.unwrap(), 1);
    let view = WalletService::new(db.clone())
        .get_or_create(WalletOwner::User(user.id))
        .await
        .unwrap();
    assert_eq!(view.balance, 7000);
}

#[tokio::test]
async fn negative_values_are_rejected() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("c9@example.com")).await;
    let astrologer = insert_astrologer(&db, "ca9@example.com", true, false).await;
    let service = ConsultationService::new(db.clone());

    let err = service
        .end(user.id, end_request(astrologer.id, -1, 10, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    let err = service
        .end(user.id, end_request(astrologer.id, 1, -10, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
