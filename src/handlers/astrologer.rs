use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::AstrologerService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/astrologers",
    tag = "astrologer",
    responses(
        (status = 200, description = "已审核且未封禁的占星师列表", body = [AstrologerPublic])
    )
)]
pub async fn list_astrologers(
    astrologer_service: web::Data<AstrologerService>,
) -> Result<HttpResponse> {
    match astrologer_service.list_public().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/astrologers/{id}",
    tag = "astrologer",
    params(
        ("id" = i64, Path, description = "占星师 ID")
    ),
    responses(
        (status = 200, description = "占星师详情及评价", body = AstrologerDetail),
        (status = 404, description = "占星师不存在")
    )
)]
pub async fn get_astrologer(
    astrologer_service: web::Data<AstrologerService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match astrologer_service.get_public(path.into_inner()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/astrologers/profile",
    tag = "astrologer",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "当前占星师资料", body = AstrologerProfile),
        (status = 403, description = "非占星师账号")
    )
)]
pub async fn get_own_profile(
    astrologer_service: web::Data<AstrologerService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match astrologer_service.get_profile(user.id).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/astrologers/profile",
    tag = "astrologer",
    request_body = UpdateAstrologerProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = AstrologerProfile),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn update_own_profile(
    astrologer_service: web::Data<AstrologerService>,
    user: AuthUser,
    request: web::Json<UpdateAstrologerProfileRequest>,
) -> Result<HttpResponse> {
    match astrologer_service
        .update_profile(user.id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/astrologers/{id}/reviews",
    tag = "astrologer",
    params(
        ("id" = i64, Path, description = "占星师 ID")
    ),
    request_body = CreateReviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "评价成功，返回更新后的评分", body = AstrologerProfile),
        (status = 400, description = "评分不在 1-5 之间"),
        (status = 404, description = "占星师不存在")
    )
)]
pub async fn add_review(
    astrologer_service: web::Data<AstrologerService>,
    user: AuthUser,
    path: web::Path<i64>,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse> {
    match astrologer_service
        .add_review(path.into_inner(), user.id, request.into_inner())
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/astrologers/admin/all",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部占星师（含咨询与评价数）", body = [AstrologerAdminView]),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_list(
    astrologer_service: web::Data<AstrologerService>,
) -> Result<HttpResponse> {
    match astrologer_service.list_all_for_admin().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/astrologers/admin/approve/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "占星师 ID")
    ),
    request_body = ApproveAstrologerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "审核通过并设置费率", body = AstrologerProfile),
        (status = 404, description = "占星师不存在")
    )
)]
pub async fn admin_approve(
    astrologer_service: web::Data<AstrologerService>,
    path: web::Path<i64>,
    request: web::Json<ApproveAstrologerRequest>,
) -> Result<HttpResponse> {
    match astrologer_service
        .approve(path.into_inner(), request.approved_rate)
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/astrologers/admin/block/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "占星师 ID")
    ),
    request_body = BlockAstrologerRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "封禁状态已更新", body = AstrologerProfile),
        (status = 404, description = "占星师不存在")
    )
)]
pub async fn admin_block(
    astrologer_service: web::Data<AstrologerService>,
    path: web::Path<i64>,
    request: web::Json<BlockAstrologerRequest>,
) -> Result<HttpResponse> {
    match astrologer_service
        .set_blocked(path.into_inner(), request.is_blocked)
        .await
    {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn astrologer_config(cfg: &mut web::ServiceConfig) {
    // 固定路径先于 {id} 注册
    cfg.service(
        web::scope("/astrologers")
            .route("", web::get().to(list_astrologers))
            .route("/profile", web::get().to(get_own_profile))
            .route("/profile", web::put().to(update_own_profile))
            .route("/admin/all", web::get().to(admin_list))
            .route("/admin/approve/{id}", web::put().to(admin_approve))
            .route("/admin/block/{id}", web::put().to(admin_block))
            .route("/{id}", web::get().to(get_astrologer))
            .route("/{id}/reviews", web::post().to(add_review)),
    );
}
