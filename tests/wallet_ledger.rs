mod common;

use common::*;
use cosmic_backend::entities::{PaymentProvider, TransactionType};
use cosmic_backend::error::AppError;
use cosmic_backend::services::{Credit, WalletOwner, WalletService};

fn razorpay_credit(amount: i64) -> Credit<'static> {
    Credit {
        amount,
        currency: "INR",
        provider: PaymentProvider::Razorpay,
        payment_id: Some("pay_1"),
        order_id: Some("order_1"),
    }
}

#[tokio::test]
async fn get_or_create_starts_at_zero_and_is_stable() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::new("w1@example.com")).await;
    let service = WalletService::new(db.clone());

    let first = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();
    let second = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();

    assert_eq!(first.balance, 0);
    assert!(first.transactions.is_empty());
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn add_funds_records_newest_credit() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("w2@example.com")).await;
    let service = WalletService::new(db.clone());
    let wallet = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();

    let updated = service.add_funds(wallet.id, razorpay_credit(500)).await.unwrap();
    assert_eq!(updated.balance, 500);

    let view = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();
    let newest = &view.transactions[0];
    assert_eq!(newest.transaction_type, TransactionType::Credit);
    assert_eq!(newest.amount, 500);
    assert_eq!(newest.provider, Some(PaymentProvider::Razorpay));
    assert_eq!(newest.currency, "INR");
    assert_eq!(newest.payment_id.as_deref(), Some("pay_1"));
}

#[tokio::test]
async fn add_then_deduct_restores_balance() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("w3@example.com")).await;
    let wallet = insert_user_wallet(&db, user.id, 1200).await;
    let service = WalletService::new(db.clone());

    service.add_funds(wallet.id, razorpay_credit(750)).await.unwrap();
    let after = service
        .deduct_funds(wallet.id, 750, "Refund reversal")
        .await
        .unwrap();
    assert_eq!(after.balance, 1200);

    let view = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();
    assert_eq!(view.transactions.len(), 2);
    assert_eq!(view.transactions[0].transaction_type, TransactionType::Debit);
    assert_eq!(view.transactions[0].amount, 750);
}

#[tokio::test]
async fn deduct_refuses_to_overdraw() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("w4@example.com")).await;
    let wallet = insert_user_wallet(&db, user.id, 100).await;
    let service = WalletService::new(db.clone());

    let err = service.deduct_funds(wallet.id, 101, "Too much").await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientBalance(_)));

    let view = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();
    assert_eq!(view.balance, 100);
    assert!(view.transactions.is_empty());
}

#[tokio::test]
async fn invalid_amounts_and_missing_wallet() {
    let db = setup_db().await;
    let service = WalletService::new(db.clone());

    let err = service.add_funds(1, razorpay_credit(0)).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = service.add_funds(999, razorpay_credit(10)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service.deduct_funds(999, 10, "x").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn astrologer_wallet_is_separate() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("w5@example.com")).await;
    let astrologer = insert_astrologer(&db, "a5@example.com", true, false).await;
    let service = WalletService::new(db.clone());

    let user_wallet = service.get_or_create(WalletOwner::User(user.id)).await.unwrap();
    let astro_wallet = service
        .get_or_create(WalletOwner::Astrologer(astrologer.id))
        .await
        .unwrap();

    assert_ne!(user_wallet.id, astro_wallet.id);
    assert_eq!(astro_wallet.astrologer_id, Some(astrologer.id));
    assert_eq!(service.list_all_for_admin().await.unwrap().len(), 2);
}
