use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::{WalletOwner, WalletService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/wallet",
    tag = "wallet",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "钱包及最近 10 条流水", body = WalletResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_wallet(
    wallet_service: web::Data<WalletService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match wallet_service.get_or_create(WalletOwner::from(user)).await {
        Ok(wallet) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": wallet
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/wallet/admin/all",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "全部钱包", body = [AdminWalletResponse]),
        (status = 403, description = "需要管理员权限")
    )
)]
pub async fn admin_wallets(wallet_service: web::Data<WalletService>) -> Result<HttpResponse> {
    match wallet_service.list_all_for_admin().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn wallet_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wallet")
            .route("", web::get().to(get_wallet))
            .route("/admin/all", web::get().to(admin_wallets)),
    );
}
