use crate::models::*;
use crate::services::{HoroscopeService, KundaliService, UploadService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/horoscope/daily",
    tag = "content",
    responses(
        (status = 200, description = "十二星座今日运势", body = [RashiReading])
    )
)]
pub async fn daily_horoscope(
    horoscope_service: web::Data<HoroscopeService>,
) -> Result<HttpResponse> {
    let readings = horoscope_service.daily().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": readings
    })))
}

#[utoipa::path(
    post,
    path = "/api/horoscope/regenerate",
    tag = "content",
    responses(
        (status = 200, description = "已重新生成", body = RegenerateResponse)
    )
)]
pub async fn regenerate_horoscope(
    horoscope_service: web::Data<HoroscopeService>,
) -> Result<HttpResponse> {
    horoscope_service.regenerate().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": RegenerateResponse { success: true }
    })))
}

#[utoipa::path(
    post,
    path = "/api/kundali/generate",
    tag = "content",
    request_body = BirthDetails,
    responses(
        (status = 200, description = "星盘", body = KundaliChart),
        (status = 400, description = "出生日期格式错误")
    )
)]
pub async fn generate_kundali(
    kundali_service: web::Data<KundaliService>,
    request: web::Json<BirthDetails>,
) -> Result<HttpResponse> {
    match kundali_service.generate(&request).await {
        Ok(chart) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": chart
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/kundali/detailed",
    tag = "content",
    request_body = BirthDetails,
    responses(
        (status = 200, description = "详细星盘订单", body = DetailedKundaliResponse),
        (status = 400, description = "出生日期格式错误")
    )
)]
pub async fn detailed_kundali(
    kundali_service: web::Data<KundaliService>,
    request: web::Json<BirthDetails>,
) -> Result<HttpResponse> {
    match kundali_service.detailed(&request).await {
        Ok(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": report
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/kundali/milan",
    tag = "content",
    request_body = MilanRequest,
    responses(
        (status = 200, description = "合盘结果", body = MilanResponse),
        (status = 400, description = "出生日期格式错误")
    )
)]
pub async fn kundali_milan(
    kundali_service: web::Data<KundaliService>,
    request: web::Json<MilanRequest>,
) -> Result<HttpResponse> {
    match kundali_service.milan(&request).await {
        Ok(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": report
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/upload/signature",
    tag = "upload",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "直传签名", body = UploadSignatureResponse),
        (status = 500, description = "图床未配置")
    )
)]
pub async fn upload_signature(upload_service: web::Data<UploadService>) -> Result<HttpResponse> {
    match upload_service.signature() {
        Ok(signature) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": signature
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/upload/image",
    tag = "upload",
    request_body = UploadImageRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "图片地址", body = UploadImageResponse),
        (status = 400, description = "图片为空"),
        (status = 502, description = "图床错误")
    )
)]
pub async fn upload_image(
    upload_service: web::Data<UploadService>,
    request: web::Json<UploadImageRequest>,
) -> Result<HttpResponse> {
    match upload_service.upload_image(&request.image).await {
        Ok(url) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": UploadImageResponse { url }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/upload/images",
    tag = "upload",
    request_body = UploadImagesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "图片地址，顺序与请求一致", body = UploadImagesResponse),
        (status = 502, description = "图床错误")
    )
)]
pub async fn upload_images(
    upload_service: web::Data<UploadService>,
    request: web::Json<UploadImagesRequest>,
) -> Result<HttpResponse> {
    match upload_service.upload_images(&request.images).await {
        Ok(urls) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": UploadImagesResponse { urls }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn content_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/horoscope/daily", web::get().to(daily_horoscope))
            .route("/horoscope/regenerate", web::post().to(regenerate_horoscope))
            .route("/kundali/generate", web::post().to(generate_kundali))
            .route("/kundali/detailed", web::post().to(detailed_kundali))
            .route("/kundali/milan", web::post().to(kundali_milan)),
    )
    .service(
        web::scope("/upload")
            .route("/signature", web::post().to(upload_signature))
            .route("/image", web::post().to(upload_image))
            .route("/images", web::post().to(upload_images)),
    );
}
