pub mod astrologer;
pub mod auth;
pub mod consultation;
pub mod content;
pub mod payment;
pub mod shop;
pub mod wallet;

pub use astrologer::astrologer_config;
pub use auth::auth_config;
pub use consultation::consultation_config;
pub use content::content_config;
pub use payment::payment_config;
pub use shop::shop_config;
pub use wallet::wallet_config;

use actix_web::web;

/// 挂载全部业务路由
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth_config)
        .configure(astrologer_config)
        .configure(consultation_config)
        .configure(wallet_config)
        .configure(payment_config)
        .configure(shop_config)
        .configure(content_config);
}
