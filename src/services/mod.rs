pub mod astrologer_service;
pub mod auth_service;
pub mod consultation_service;
pub mod horoscope_service;
pub mod kundali_service;
pub mod payment_service;
pub mod pricing;
pub mod shop_service;
pub mod upload_service;
pub mod wallet_service;

pub use astrologer_service::*;
pub use auth_service::*;
pub use consultation_service::*;
pub use horoscope_service::HoroscopeService;
pub use kundali_service::KundaliService;
pub use payment_service::*;
pub use shop_service::*;
pub use upload_service::*;
pub use wallet_service::{Credit, WalletOwner, WalletService};
