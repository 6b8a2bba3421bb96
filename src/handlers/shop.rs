use crate::middlewares::AuthUser;
use crate::models::*;
use crate::services::ShopService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/shop/products",
    tag = "shop",
    params(ProductQuery),
    responses(
        (status = 200, description = "在售商品", body = [ProductResponse])
    )
)]
pub async fn list_products(
    shop_service: web::Data<ShopService>,
    query: web::Query<ProductQuery>,
) -> Result<HttpResponse> {
    match shop_service.list_products(query.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shop/products/{id}",
    tag = "shop",
    params(
        ("id" = i64, Path, description = "商品 ID")
    ),
    responses(
        (status = 200, description = "商品详情", body = ProductResponse),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn get_product(
    shop_service: web::Data<ShopService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match shop_service.get_product(path.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/shop/products",
    tag = "admin",
    request_body = CreateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建成功", body = ProductResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn create_product(
    shop_service: web::Data<ShopService>,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse> {
    match shop_service.create_product(request.into_inner()).await {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/shop/products/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "商品 ID")
    ),
    request_body = UpdateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新成功", body = ProductResponse),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn update_product(
    shop_service: web::Data<ShopService>,
    path: web::Path<i64>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse> {
    match shop_service
        .update_product(path.into_inner(), request.into_inner())
        .await
    {
        Ok(product) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": product
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/shop/products/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "商品 ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn delete_product(
    shop_service: web::Data<ShopService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match shop_service.delete_product(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/shop/orders",
    tag = "shop",
    request_body = CreateOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "下单成功", body = ShopOrderResponse),
        (status = 400, description = "订单为空或数量无效"),
        (status = 403, description = "占星师账号不能下单"),
        (status = 404, description = "商品不存在")
    )
)]
pub async fn create_order(
    shop_service: web::Data<ShopService>,
    user: AuthUser,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match shop_service.create_order(user.id, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shop/orders",
    tag = "shop",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "我的订单", body = [ShopOrderResponse]),
        (status = 403, description = "占星师账号无订单")
    )
)]
pub async fn list_orders(
    shop_service: web::Data<ShopService>,
    user: AuthUser,
) -> Result<HttpResponse> {
    match shop_service.list_orders(user.id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/shop/stats",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "订单统计", body = ShopStatsResponse)
    )
)]
pub async fn shop_stats(shop_service: web::Data<ShopService>) -> Result<HttpResponse> {
    match shop_service.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn shop_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shop")
            .route("/products", web::get().to(list_products))
            .route("/products", web::post().to(create_product))
            .route("/products/{id}", web::get().to(get_product))
            .route("/products/{id}", web::put().to(update_product))
            .route("/products/{id}", web::delete().to(delete_product))
            .route("/orders", web::post().to(create_order))
            .route("/orders", web::get().to(list_orders))
            .route("/stats", web::get().to(shop_stats)),
    );
}
