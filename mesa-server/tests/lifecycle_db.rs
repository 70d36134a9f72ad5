//! End-to-end lifecycle tests against a real SQLite database.
//!
//! Each test opens its own database file in a temp directory; the pool
//! hands out multiple connections, so `:memory:` is not an option.

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use mesa_server::db::DbService;
use mesa_server::db::repository::{
    OrderRepository, ProductRepository, RepoError, SaleRepository, SqliteOrderRepository,
    SqliteSaleRepository, SqliteTableRepository, TableRepository,
};
use mesa_server::orders::OrderLifecycle;
use shared::ErrorCode;
use shared::models::{
    DiningTableCreate, NewSale, OrderCreate, OrderItemInput, OrderStatus, OrderUpdate,
    PaymentStatus, ProductCreate, ProductUpdate, TableStatus,
};

struct TestDb {
    // Held so the directory outlives the pool
    _dir: TempDir,
    orders: Arc<dyn OrderRepository>,
    tables: Arc<dyn TableRepository>,
    sales: Arc<dyn SaleRepository>,
    table_store: SqliteTableRepository,
    products: ProductRepository,
    lifecycle: OrderLifecycle,
}

async fn setup() -> TestDb {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    let table_store = SqliteTableRepository::new(db.pool.clone());
    let products = ProductRepository::new(db.pool.clone());
    let orders: Arc<dyn OrderRepository> = Arc::new(SqliteOrderRepository::new(db.pool.clone()));
    let tables: Arc<dyn TableRepository> = Arc::new(table_store.clone());
    let sales: Arc<dyn SaleRepository> = Arc::new(SqliteSaleRepository::new(db.pool.clone()));
    let lifecycle = OrderLifecycle::new(orders.clone(), tables.clone(), sales.clone());

    TestDb {
        _dir: dir,
        orders,
        tables,
        sales,
        table_store,
        products,
        lifecycle,
    }
}

async fn seed_table(db: &TestDb, number: i32) -> i64 {
    db.table_store
        .create(DiningTableCreate {
            number,
            capacity: Some(4),
        })
        .await
        .unwrap()
        .id
}

fn order_for(table_id: i64) -> OrderCreate {
    OrderCreate {
        table_id,
        customer_name: "Marco".to_string(),
        customer_phone: Some("555-0101".to_string()),
        payment_method: Some("card".to_string()),
        notes: None,
        items: vec![
            OrderItemInput {
                product_id: 1,
                quantity: 2,
                price: Decimal::new(950, 2),
            },
            OrderItemInput {
                product_id: 2,
                quantity: 1,
                price: Decimal::new(400, 2),
            },
        ],
    }
}

#[tokio::test]
async fn full_lifecycle_creates_sale_and_frees_table() {
    let db = setup().await;
    let table_id = seed_table(&db, 1).await;

    let detail = db.lifecycle.create_order(order_for(table_id)).await.unwrap();
    // 2 * 9.50 + 4.00
    assert_eq!(detail.order.total, Decimal::new(2300, 2));
    assert_eq!(detail.items.len(), 2);

    let table = db.tables.find_by_id(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);

    let order = db
        .lifecycle
        .update_order(
            detail.order.id,
            OrderUpdate {
                status: Some(OrderStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.completed_at.is_some());

    let sale = db
        .sales
        .find_by_order_id(order.id)
        .await
        .unwrap()
        .expect("sale materialized on completion");
    assert_eq!(sale.amount, Decimal::new(2300, 2));
    assert_eq!(sale.payment_method, "card");

    let table = db.tables.find_by_id(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Available);
}

#[tokio::test]
async fn unique_index_rejects_second_live_sale() {
    let db = setup().await;
    let table_id = seed_table(&db, 2).await;
    let detail = db.lifecycle.create_order(order_for(table_id)).await.unwrap();

    let sale = NewSale {
        order_id: Some(detail.order.id),
        amount: Decimal::new(2300, 2),
        payment_method: "cash".to_string(),
        description: "first".to_string(),
    };
    db.sales.create(sale.clone()).await.unwrap();

    let err = db.sales.create(sale).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn soft_deleted_sale_frees_the_index_slot() {
    let db = setup().await;
    let table_id = seed_table(&db, 3).await;
    let detail = db.lifecycle.create_order(order_for(table_id)).await.unwrap();

    let sale = NewSale {
        order_id: Some(detail.order.id),
        amount: Decimal::new(2300, 2),
        payment_method: "cash".to_string(),
        description: "first".to_string(),
    };
    let first = db.sales.create(sale.clone()).await.unwrap();
    assert!(db.sales.soft_delete(first.id).await.unwrap());

    // The partial index only covers live rows.
    db.sales.create(sale).await.unwrap();
}

#[tokio::test]
async fn completing_twice_keeps_a_single_sale() {
    let db = setup().await;
    let table_id = seed_table(&db, 4).await;
    let detail = db.lifecycle.create_order(order_for(table_id)).await.unwrap();
    let id = detail.order.id;

    let complete = OrderUpdate {
        status: Some(OrderStatus::Completed),
        ..Default::default()
    };
    db.lifecycle.update_order(id, complete.clone()).await.unwrap();
    db.lifecycle.update_order(id, complete).await.unwrap();

    let sales = db.sales.find_all().await.unwrap();
    assert_eq!(sales.len(), 1);
}

#[tokio::test]
async fn soft_deleted_order_is_gone_from_reads_and_writes() {
    let db = setup().await;
    let table_id = seed_table(&db, 5).await;
    let detail = db.lifecycle.create_order(order_for(table_id)).await.unwrap();
    let id = detail.order.id;

    db.lifecycle.delete_order(id).await.unwrap();

    assert!(db.orders.find_by_id(id).await.unwrap().is_none());
    assert!(db.orders.find_detail(id).await.unwrap().is_none());

    let patch = OrderUpdate {
        notes: Some("late note".to_string()),
        ..Default::default()
    };
    let err = db.lifecycle.update_order(id, patch).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    let table = db.tables.find_by_id(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Available);
}

#[tokio::test]
async fn table_with_two_orders_stays_occupied() {
    let db = setup().await;
    let table_id = seed_table(&db, 6).await;

    let first = db.lifecycle.create_order(order_for(table_id)).await.unwrap();
    let _second = db.lifecycle.create_order(order_for(table_id)).await.unwrap();

    db.lifecycle
        .update_order(
            first.order.id,
            OrderUpdate {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let table = db.tables.find_by_id(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
}

#[tokio::test]
async fn item_price_snapshot_survives_catalog_change() {
    let db = setup().await;
    let table_id = seed_table(&db, 9).await;

    let product = db
        .products
        .create(ProductCreate {
            name: "Tortilla".to_string(),
            category_id: None,
            price: Decimal::new(1000, 2),
            is_available: None,
        })
        .await
        .unwrap();

    let detail = db
        .lifecycle
        .create_order(OrderCreate {
            table_id,
            customer_name: "Lucia".to_string(),
            customer_phone: None,
            payment_method: None,
            notes: None,
            items: vec![OrderItemInput {
                product_id: product.id,
                quantity: 1,
                price: Decimal::new(1000, 2),
            }],
        })
        .await
        .unwrap();

    db.products
        .update(
            product.id,
            ProductUpdate {
                price: Some(Decimal::new(2000, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let detail = db
        .orders
        .find_detail(detail.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.items[0].price, Decimal::new(1000, 2));
    assert_eq!(detail.order.total, Decimal::new(1000, 2));
    // The joined catalog row reflects the new price; the line item does not.
    assert_eq!(
        detail.items[0].product.as_ref().unwrap().price,
        Decimal::new(2000, 2)
    );
}

#[tokio::test]
async fn duplicate_table_number_is_rejected() {
    let db = setup().await;
    seed_table(&db, 7).await;

    let err = db
        .table_store
        .create(DiningTableCreate {
            number: 7,
            capacity: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn table_referenced_by_orders_cannot_be_deleted() {
    let db = setup().await;
    let table_id = seed_table(&db, 8).await;
    db.lifecycle.create_order(order_for(table_id)).await.unwrap();

    let err = db.table_store.delete(table_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}
