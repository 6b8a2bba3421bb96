use crate::entities::{OrderStatus, order_entity, order_item_entity, product_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub sale_price: Option<i64>,
    pub images: Vec<String>,
    pub category: String,
    pub stock: i32,
    #[schema(value_type = Object)]
    pub variants: Value,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_entity::Model> for ProductResponse {
    fn from(m: product_entity::Model) -> Self {
        let images = serde_json::from_str(&m.images).unwrap_or_default();
        let variants = m
            .variants
            .as_deref()
            .and_then(|v| serde_json::from_str(v).ok())
            .unwrap_or_else(|| Value::Array(Vec::new()));
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            sale_price: m.sale_price,
            images,
            category: m.category,
            stock: m.stock,
            variants,
            is_available: m.is_available,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, IntoParams)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    #[serde(alias = "salePrice")]
    pub sale_price: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[schema(value_type = Option<Object>)]
    pub variants: Option<Value>,
    #[serde(alias = "isAvailable")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    #[serde(alias = "salePrice")]
    pub sale_price: Option<i64>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub variants: Option<Value>,
    #[serde(alias = "isAvailable")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    #[serde(alias = "productId")]
    pub product_id: i64,
    pub quantity: i32,
    pub variant: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    #[serde(alias = "shippingAddress")]
    #[schema(value_type = Option<Object>)]
    pub shipping_address: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price: i64,
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductResponse>,
}

impl From<order_item_entity::Model> for OrderItemResponse {
    fn from(m: order_item_entity::Model) -> Self {
        Self {
            id: m.id,
            product_id: m.product_id,
            quantity: m.quantity,
            price: m.price,
            variant: m.variant,
            product: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShopOrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub total_amount: i64,
    pub status: OrderStatus,
    #[schema(value_type = Option<Object>)]
    pub shipping_address: Option<Value>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShopOrderResponse {
    pub fn new(order: order_entity::Model, items: Vec<OrderItemResponse>) -> Self {
        let shipping_address = order
            .shipping_address
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());
        Self {
            id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: order.status,
            shipping_address,
            items,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShopStatsResponse {
    pub total_orders: i64,
    /// 仅统计已支付订单
    pub revenue: i64,
    pub recent_orders: Vec<ShopOrderResponse>,
}
