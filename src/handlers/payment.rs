use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{PaymentService, WalletOwner};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/payment/razorpay/order",
    tag = "payment",
    request_body = CreatePaymentOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Razorpay 订单"),
        (status = 400, description = "金额无效"),
        (status = 502, description = "支付网关错误")
    )
)]
pub async fn create_razorpay_order(
    payment_service: web::Data<PaymentService>,
    request: web::Json<CreatePaymentOrderRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .create_razorpay_order(request.amount, request.currency.as_deref())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/payment/razorpay/verify",
    tag = "payment",
    request_body = VerifyRazorpayRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "签名校验结果，通过后入账", body = PaymentResult)
    )
)]
pub async fn verify_razorpay(
    payment_service: web::Data<PaymentService>,
    user: AuthUser,
    request: web::Json<VerifyRazorpayRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .verify_razorpay(WalletOwner::from(user), request.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/payment/paypal/order",
    tag = "payment",
    request_body = CreatePaymentOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "PayPal 订单"),
        (status = 502, description = "支付网关错误")
    )
)]
pub async fn create_paypal_order(
    payment_service: web::Data<PaymentService>,
    request: web::Json<CreatePaymentOrderRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .create_paypal_order(request.amount, request.currency.as_deref())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/payment/paypal/capture",
    tag = "payment",
    request_body = CapturePaypalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "捕获结果，COMPLETED 时入账", body = PaymentResult),
        (status = 502, description = "支付网关错误")
    )
)]
pub async fn capture_paypal(
    payment_service: web::Data<PaymentService>,
    user: AuthUser,
    request: web::Json<CapturePaypalRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .capture_paypal(WalletOwner::from(user), request.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payment/pricing",
    tag = "payment",
    params(PricingQuery),
    responses(
        (status = 200, description = "套餐展示价", body = PlanPricing)
    )
)]
pub async fn pricing(
    payment_service: web::Data<PaymentService>,
    query: web::Query<PricingQuery>,
) -> Result<HttpResponse> {
    let pricing = payment_service.pricing(
        query.plan.as_deref(),
        query.international.unwrap_or(false),
    );
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": pricing
    })))
}

#[utoipa::path(
    post,
    path = "/payment/report-checkout",
    tag = "payment",
    request_body = ReportCheckoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "报告支付方式与金额", body = ReportCheckoutResponse),
        (status = 502, description = "支付网关错误")
    )
)]
pub async fn report_checkout(
    payment_service: web::Data<PaymentService>,
    request: web::Json<ReportCheckoutRequest>,
) -> Result<HttpResponse> {
    match payment_service.checkout_report(request.into_inner()).await {
        Ok(checkout) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": checkout
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payment")
            .route("/razorpay/order", web::post().to(create_razorpay_order))
            .route("/razorpay/verify", web::post().to(verify_razorpay))
            .route("/paypal/order", web::post().to(create_paypal_order))
            .route("/paypal/capture", web::post().to(capture_paypal))
            .route("/pricing", web::get().to(pricing))
            .route("/report-checkout", web::post().to(report_checkout)),
    );
}
