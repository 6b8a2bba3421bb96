use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::entities::{
    ConsultationType, OrderStatus, PaymentProvider, Plan, Role, TransactionType,
};
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::get_profile,
        handlers::auth::update_profile,
        handlers::astrologer::list_astrologers,
        handlers::astrologer::get_astrologer,
        handlers::astrologer::get_own_profile,
        handlers::astrologer::update_own_profile,
        handlers::astrologer::add_review,
        handlers::astrologer::admin_list,
        handlers::astrologer::admin_approve,
        handlers::astrologer::admin_block,
        handlers::consultation::start_consultation,
        handlers::consultation::end_consultation,
        handlers::consultation::consultation_history,
        handlers::wallet::get_wallet,
        handlers::wallet::admin_wallets,
        handlers::payment::create_razorpay_order,
        handlers::payment::verify_razorpay,
        handlers::payment::create_paypal_order,
        handlers::payment::capture_paypal,
        handlers::payment::pricing,
        handlers::payment::report_checkout,
        handlers::shop::list_products,
        handlers::shop::get_product,
        handlers::shop::create_product,
        handlers::shop::update_product,
        handlers::shop::delete_product,
        handlers::shop::create_order,
        handlers::shop::list_orders,
        handlers::shop::shop_stats,
        handlers::content::daily_horoscope,
        handlers::content::regenerate_horoscope,
        handlers::content::generate_kundali,
        handlers::content::detailed_kundali,
        handlers::content::kundali_milan,
        handlers::content::upload_signature,
        handlers::content::upload_image,
        handlers::content::upload_images,
    ),
    components(
        schemas(
            Role,
            Plan,
            ConsultationType,
            OrderStatus,
            TransactionType,
            PaymentProvider,
            SignupRequest,
            LoginRequest,
            AccountSummary,
            AuthResponse,
            UserProfileResponse,
            UpdateUserProfileRequest,
            AstrologerPublic,
            ReviewResponse,
            AstrologerDetail,
            AstrologerProfile,
            UpdateAstrologerProfileRequest,
            AstrologerAdminView,
            ApproveAstrologerRequest,
            BlockAstrologerRequest,
            CreateReviewRequest,
            StartConsultationRequest,
            ConsultationQuote,
            EndConsultationRequest,
            ConsultationResponse,
            WalletTransactionResponse,
            WalletResponse,
            AdminWalletResponse,
            CreatePaymentOrderRequest,
            VerifyRazorpayRequest,
            CapturePaypalRequest,
            PaymentResult,
            ReportPrices,
            PlanPricing,
            ReportType,
            ReportCheckoutRequest,
            ReportCheckoutResponse,
            ProductResponse,
            CreateProductRequest,
            UpdateProductRequest,
            OrderItemRequest,
            CreateOrderRequest,
            OrderItemResponse,
            ShopOrderResponse,
            ShopStatsResponse,
            RashiReading,
            RegenerateResponse,
            BirthDetails,
            PlanetPositions,
            KundaliChart,
            DetailedKundaliResponse,
            MilanRequest,
            GunaBreakdown,
            Compatibility,
            MilanResponse,
            UploadSignatureResponse,
            UploadImageRequest,
            UploadImagesRequest,
            UploadImageResponse,
            UploadImagesResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "astrologer", description = "Astrologer directory API"),
        (name = "consultation", description = "Consultation billing API"),
        (name = "wallet", description = "Wallet API"),
        (name = "payment", description = "Razorpay / PayPal payment API"),
        (name = "shop", description = "Gem shop API"),
        (name = "content", description = "Horoscope and Kundali API"),
        (name = "upload", description = "Media upload API"),
        (name = "admin", description = "Admin API"),
    ),
    info(
        title = "Cosmic Backend API",
        version = "1.0.0",
        description = "Astrology consultation marketplace REST API"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
