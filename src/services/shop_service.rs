use crate::entities::{
    OrderStatus, order_entity as orders, order_item_entity as order_items,
    product_entity as products,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, CreateProductRequest, OrderItemResponse, ProductQuery, ProductResponse,
    ShopOrderResponse, ShopStatsResponse, UpdateProductRequest,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;

const DEFAULT_CATEGORY: &str = "General";
const RECENT_ORDERS: u64 = 10;

#[derive(Clone)]
pub struct ShopService {
    pool: DatabaseConnection,
}

impl ShopService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 在售商品，支持分类与名称/描述模糊搜索（不区分大小写）
    pub async fn list_products(&self, query: ProductQuery) -> AppResult<Vec<ProductResponse>> {
        let mut select = products::Entity::find().filter(products::Column::IsAvailable.eq(true));

        if let Some(category) = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            select = select.filter(products::Column::Category.eq(category));
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(products::Column::Name))).like(&pattern))
                    .add(
                        Expr::expr(Func::lower(Expr::col(products::Column::Description)))
                            .like(&pattern),
                    ),
            );
        }

        let list = select
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_product(&self, id: i64) -> AppResult<ProductResponse> {
        products::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    pub async fn create_product(&self, request: CreateProductRequest) -> AppResult<ProductResponse> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Product name is required".to_string()));
        }
        validate_money(request.price, request.sale_price)?;
        validate_stock(request.stock)?;

        let now = Utc::now();
        let product = products::ActiveModel {
            name: Set(name),
            description: Set(request.description),
            price: Set(request.price),
            sale_price: Set(request.sale_price),
            images: Set(serde_json::to_string(&request.images)?),
            category: Set(request
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            stock: Set(request.stock),
            variants: Set(request.variants.map(|v| v.to_string())),
            is_available: Set(request.is_available.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Product {} created: {}", product.id, product.name);
        Ok(product.into())
    }

    pub async fn update_product(
        &self,
        id: i64,
        request: UpdateProductRequest,
    ) -> AppResult<ProductResponse> {
        let product = products::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        validate_money(
            request.price.unwrap_or(product.price),
            request.sale_price.or(product.sale_price),
        )?;
        if let Some(stock) = request.stock {
            validate_stock(stock)?;
        }

        let mut am = product.into_active_model();
        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::ValidationError("Product name is required".to_string()));
            }
            am.name = Set(name);
        }
        if let Some(description) = request.description {
            am.description = Set(Some(description));
        }
        if let Some(price) = request.price {
            am.price = Set(price);
        }
        if let Some(sale_price) = request.sale_price {
            am.sale_price = Set(Some(sale_price));
        }
        if let Some(images) = request.images {
            am.images = Set(serde_json::to_string(&images)?);
        }
        if let Some(category) = request.category {
            am.category = Set(category);
        }
        if let Some(stock) = request.stock {
            am.stock = Set(stock);
        }
        if let Some(variants) = request.variants {
            am.variants = Set(Some(variants.to_string()));
        }
        if let Some(is_available) = request.is_available {
            am.is_available = Set(is_available);
        }
        am.updated_at = Set(Utc::now());

        Ok(am.update(&self.pool).await?.into())
    }

    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        let result = products::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        log::info!("Product {} deleted", id);
        Ok(())
    }

    /// 下单：按当前价格快照每一行，库存不扣减
    pub async fn create_order(
        &self,
        user_id: i64,
        request: CreateOrderRequest,
    ) -> AppResult<ShopOrderResponse> {
        if request.items.is_empty() {
            return Err(AppError::ValidationError(
                "Order must contain at least one item".to_string(),
            ));
        }
        if request.items.iter().any(|i| i.quantity < 1) {
            return Err(AppError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let mut lines = Vec::with_capacity(request.items.len());
        let mut total: i64 = 0;
        for item in &request.items {
            let product = products::Entity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Product {} not found", item.product_id))
                })?;
            let price = product.effective_price();
            total = price
                .checked_mul(i64::from(item.quantity))
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| AppError::ValidationError("Order total is too large".to_string()))?;
            lines.push((item, price));
        }

        let now = Utc::now();
        let order = orders::ActiveModel {
            user_id: Set(user_id),
            total_amount: Set(total),
            status: Set(OrderStatus::Pending),
            shipping_address: Set(request.shipping_address.as_ref().map(|v| v.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (item, price) in lines {
            let saved = order_items::ActiveModel {
                order_id: Set(order.id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                price: Set(price),
                variant: Set(item.variant.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            items.push(OrderItemResponse::from(saved));
        }

        txn.commit().await?;

        log::info!(
            "Order {} created for user {}: {} items, total {}",
            order.id,
            user_id,
            items.len(),
            total
        );
        Ok(ShopOrderResponse::new(order, items))
    }

    /// 用户订单，新的在前，附带明细与商品
    pub async fn list_orders(&self, user_id: i64) -> AppResult<Vec<ShopOrderResponse>> {
        let list = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(&self.pool)
            .await?;
        with_items(&self.pool, list).await
    }

    /// 管理后台统计
    pub async fn stats(&self) -> AppResult<ShopStatsResponse> {
        let total_orders = orders::Entity::find().count(&self.pool).await?;

        let paid: Vec<i64> = orders::Entity::find()
            .select_only()
            .column(orders::Column::TotalAmount)
            .filter(orders::Column::Status.eq(OrderStatus::Paid))
            .into_tuple()
            .all(&self.pool)
            .await?;
        let revenue = paid.iter().sum();

        let recent = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(RECENT_ORDERS)
            .all(&self.pool)
            .await?;

        Ok(ShopStatsResponse {
            total_orders: total_orders as i64,
            revenue,
            recent_orders: with_items(&self.pool, recent).await?,
        })
    }
}

async fn with_items<C: ConnectionTrait>(
    db: &C,
    list: Vec<orders::Model>,
) -> AppResult<Vec<ShopOrderResponse>> {
    if list.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = list.iter().map(|o| o.id).collect();
    let all_items = order_items::Entity::find()
        .filter(order_items::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_items::Column::Id)
        .all(db)
        .await?;

    let mut product_ids: Vec<i64> = all_items.iter().map(|i| i.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let products_by_id: HashMap<i64, products::Model> = products::Entity::find()
        .filter(products::Column::Id.is_in(product_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut grouped: HashMap<i64, Vec<OrderItemResponse>> = HashMap::new();
    for item in all_items {
        let product = products_by_id.get(&item.product_id).cloned().map(Into::into);
        let order_id = item.order_id;
        let mut response = OrderItemResponse::from(item);
        response.product = product;
        grouped.entry(order_id).or_default().push(response);
    }

    Ok(list
        .into_iter()
        .map(|order| {
            let items = grouped.remove(&order.id).unwrap_or_default();
            ShopOrderResponse::new(order, items)
        })
        .collect())
}

fn validate_money(price: i64, sale_price: Option<i64>) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::ValidationError("Price cannot be negative".to_string()));
    }
    if sale_price.is_some_and(|s| s < 0) {
        return Err(AppError::ValidationError(
            "Sale price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::ValidationError("Stock cannot be negative".to_string()));
    }
    Ok(())
}
