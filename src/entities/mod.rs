pub mod astrologers;
pub mod consultations;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;
pub mod wallet_transactions;
pub mod wallets;

pub use astrologers as astrologer_entity;
pub use consultations as consultation_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use products as product_entity;
pub use reviews as review_entity;
pub use users as user_entity;
pub use wallet_transactions as wallet_transaction_entity;
pub use wallets as wallet_entity;

pub use consultations::ConsultationType;
pub use orders::OrderStatus;
pub use users::{Plan, Role};
pub use wallet_transactions::{PaymentProvider, TransactionType};
