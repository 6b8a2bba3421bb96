pub mod astrologer;
pub mod auth;
pub mod consultation;
pub mod horoscope;
pub mod kundali;
pub mod payment;
pub mod shop;
pub mod upload;
pub mod wallet;

pub use astrologer::*;
pub use auth::*;
pub use consultation::*;
pub use horoscope::*;
pub use kundali::*;
pub use payment::*;
pub use shop::*;
pub use upload::*;
pub use wallet::*;
