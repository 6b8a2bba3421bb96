use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::ConsultationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/consultation/start",
    tag = "consultation",
    request_body = StartConsultationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "报价（免费体验或按分钟计费）", body = ConsultationQuote),
        (status = 402, description = "余额不足"),
        (status = 404, description = "用户或占星师不存在")
    )
)]
pub async fn start_consultation(
    consultation_service: web::Data<ConsultationService>,
    user: AuthUser,
    request: web::Json<StartConsultationRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    match consultation_service
        .start(user.id, request.astrologer_id, request.consultation_type)
        .await
    {
        Ok(quote) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": quote
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/consultation/end",
    tag = "consultation",
    request_body = EndConsultationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "结算完成", body = ConsultationResponse),
        (status = 400, description = "时长或金额为负")
    )
)]
pub async fn end_consultation(
    consultation_service: web::Data<ConsultationService>,
    user: AuthUser,
    request: web::Json<EndConsultationRequest>,
) -> Result<HttpResponse> {
    match consultation_service
        .end(user.id, request.into_inner())
        .await
    {
        Ok(consultation) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": consultation
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/consultation/history",
    tag = "consultation",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "咨询记录", body = [ConsultationResponse])
    )
)]
pub async fn consultation_history(
    consultation_service: web::Data<ConsultationService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match consultation_service.history(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn consultation_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/consultation")
            .route("/start", web::post().to(start_consultation))
            .route("/end", web::post().to(end_consultation))
            .route("/history", web::get().to(consultation_history)),
    );
}
