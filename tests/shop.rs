mod common;

use common::*;
use cosmic_backend::entities::{OrderStatus, order_entity as orders};
use cosmic_backend::error::AppError;
use cosmic_backend::models::{
    CreateOrderRequest, CreateProductRequest, OrderItemRequest, ProductQuery, UpdateProductRequest,
};
use cosmic_backend::services::ShopService;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use serde_json::json;

fn product(name: &str, price: i64, sale_price: Option<i64>) -> CreateProductRequest {
    CreateProductRequest {
        name: name.to_string(),
        description: Some(format!("{} for daily wear", name)),
        price,
        sale_price,
        images: vec!["https://img.example.com/a.jpg".to_string()],
        category: Some("Gemstones".to_string()),
        stock: 10,
        variants: Some(json!([{"size": "5 carat"}])),
        is_available: None,
    }
}

fn query(category: Option<&str>, search: Option<&str>) -> ProductQuery {
    ProductQuery {
        category: category.map(str::to_string),
        search: search.map(str::to_string),
    }
}

#[tokio::test]
async fn catalog_filters_and_hides_unavailable() {
    let db = setup_db().await;
    let shop = ShopService::new(db.clone());

    let ruby = shop.create_product(product("Ruby Ring", 500_000, None)).await.unwrap();
    shop.create_product(product("Rudraksha Mala", 120_000, None)).await.unwrap();
    let hidden = shop.create_product(product("Blue Sapphire", 900_000, None)).await.unwrap();
    shop.update_product(
        hidden.id,
        UpdateProductRequest {
            is_available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let all = shop.list_products(query(None, None)).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|p| p.id != hidden.id));

    let found = shop.list_products(query(None, Some("RUBY"))).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, ruby.id);
    assert_eq!(found[0].images.len(), 1);

    // 描述也参与搜索
    let by_description = shop.list_products(query(None, Some("daily wear"))).await.unwrap();
    assert_eq!(by_description.len(), 2);

    assert!(shop.list_products(query(Some("Books"), None)).await.unwrap().is_empty());
    assert_eq!(
        shop.list_products(query(Some("Gemstones"), None)).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn product_lookup_and_delete() {
    let db = setup_db().await;
    let shop = ShopService::new(db.clone());

    let created = shop.create_product(product("Pearl", 80_000, None)).await.unwrap();
    assert_eq!(shop.get_product(created.id).await.unwrap().name, "Pearl");

    shop.delete_product(created.id).await.unwrap();
    assert!(matches!(
        shop.get_product(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        shop.delete_product(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn order_snapshots_effective_price() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("buyer@example.com")).await;
    let shop = ShopService::new(db.clone());

    let on_sale = shop.create_product(product("Emerald", 300_000, Some(250_000))).await.unwrap();
    let zero_sale = shop.create_product(product("Coral", 40_000, Some(0))).await.unwrap();

    let order = shop
        .create_order(
            user.id,
            CreateOrderRequest {
                items: vec![
                    OrderItemRequest {
                        product_id: on_sale.id,
                        quantity: 2,
                        variant: Some("5 carat".to_string()),
                    },
                    OrderItemRequest {
                        product_id: zero_sale.id,
                        quantity: 1,
                        variant: None,
                    },
                ],
                shipping_address: Some(json!({"city": "Jaipur"})),
            },
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 2 * 250_000 + 40_000);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].price, 250_000);
    assert_eq!(order.items[1].price, 40_000);
    assert_eq!(order.shipping_address, Some(json!({"city": "Jaipur"})));

    // 下单不扣库存
    assert_eq!(shop.get_product(on_sale.id).await.unwrap().stock, 10);

    let history = shop.list_orders(user.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].items.len(), 2);
    assert!(history[0].items[0].product.is_some());
}

#[tokio::test]
async fn invalid_orders_are_rejected() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("buyer2@example.com")).await;
    let shop = ShopService::new(db.clone());
    let item = shop.create_product(product("Opal", 60_000, None)).await.unwrap();

    let empty = CreateOrderRequest {
        items: vec![],
        shipping_address: None,
    };
    assert!(matches!(
        shop.create_order(user.id, empty).await.unwrap_err(),
        AppError::ValidationError(_)
    ));

    let zero_qty = CreateOrderRequest {
        items: vec![OrderItemRequest {
            product_id: item.id,
            quantity: 0,
            variant: None,
        }],
        shipping_address: None,
    };
    assert!(matches!(
        shop.create_order(user.id, zero_qty).await.unwrap_err(),
        AppError::ValidationError(_)
    ));

    let unknown = CreateOrderRequest {
        items: vec![OrderItemRequest {
            product_id: 9999,
            quantity: 1,
            variant: None,
        }],
        shipping_address: None,
    };
    assert!(matches!(
        shop.create_order(user.id, unknown).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(shop.list_orders(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn stats_count_revenue_from_paid_orders_only() {
    let db = setup_db().await;
    let user = insert_user(&db, UserSeed::returning("buyer3@example.com")).await;
    let shop = ShopService::new(db.clone());
    let item = shop.create_product(product("Topaz", 10_000, None)).await.unwrap();

    let mut ids = Vec::new();
    for quantity in [1, 3] {
        let order = shop
            .create_order(
                user.id,
                CreateOrderRequest {
                    items: vec![OrderItemRequest {
                        product_id: item.id,
                        quantity,
                        variant: None,
                    }],
                    shipping_address: None,
                },
            )
            .await
            .unwrap();
        ids.push(order.id);
    }

    let paid = orders::Entity::find_by_id(ids[1]).one(&db).await.unwrap().unwrap();
    let mut am = paid.into_active_model();
    am.status = Set(OrderStatus::Paid);
    am.update(&db).await.unwrap();

    let stats = shop.stats().await.unwrap();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.revenue, 30_000);
    assert_eq!(stats.recent_orders.len(), 2);
}
