use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use cosmic_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{GeminiClient, PaypalClient, RazorpayClient},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 外部服务
    let razorpay = RazorpayClient::new(config.razorpay.clone());
    let paypal = PaypalClient::new(config.paypal.clone());
    let gemini = GeminiClient::new(config.gemini.clone());
    if !gemini.is_enabled() {
        log::warn!("Gemini API key not set, horoscope and kundali use local generation");
    }

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    match auth_service.ensure_admin(&config.admin).await {
        Ok(Some(id)) => log::info!("Admin account ready (id {})", id),
        Ok(None) => log::info!("No admin bootstrap configured"),
        Err(e) => log::error!("Failed to bootstrap admin account: {:?}", e),
    }

    let wallet_service = WalletService::new(pool.clone());
    let astrologer_service = AstrologerService::new(pool.clone());
    let consultation_service = ConsultationService::new(pool.clone());
    let payment_service = PaymentService::new(wallet_service.clone(), razorpay, paypal);
    let shop_service = ShopService::new(pool.clone());
    let horoscope_service = HoroscopeService::new(gemini.clone());
    let kundali_service = KundaliService::new(gemini);
    let upload_service = UploadService::new(config.cloudinary.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(wallet_service.clone()))
            .app_data(web::Data::new(astrologer_service.clone()))
            .app_data(web::Data::new(consultation_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(shop_service.clone()))
            .app_data(web::Data::new(horoscope_service.clone()))
            .app_data(web::Data::new(kundali_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .configure(swagger_config)
            .configure(handlers::routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
