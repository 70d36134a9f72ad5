//! Order Repository
//!
//! Orders and their line item snapshots. Reads and patches only see live
//! rows (`deleted_at IS NULL`); a patch against a soft-deleted order reports
//! not-found rather than resurrecting it.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shared::models::{NewOrder, Order, OrderDetail, OrderItemDetail, OrderPatch, Product};
use shared::util::{now_millis, snowflake_id};

use super::{OrderRepository, RepoError, RepoResult, parse_decimal};

#[derive(Clone)]
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn order_from_row(row: &SqliteRow) -> RepoResult<Order> {
        Ok(Order {
            id: row.try_get("id")?,
            table_id: row.try_get("table_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            status: row
                .try_get::<String, _>("status")?
                .parse()
                .map_err(RepoError::Database)?,
            payment_method: row.try_get("payment_method")?,
            payment_status: row
                .try_get::<String, _>("payment_status")?
                .parse()
                .map_err(RepoError::Database)?,
            total: parse_decimal(&row.try_get::<String, _>("total")?)?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            completed_at: row.try_get("completed_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    fn item_from_row(row: &SqliteRow) -> RepoResult<OrderItemDetail> {
        // LEFT JOIN: the product may have been removed from the catalog
        let product = match row.try_get::<Option<i64>, _>("p_id")? {
            Some(product_id) => Some(Product {
                id: product_id,
                name: row.try_get("p_name")?,
                category_id: row.try_get("p_category_id")?,
                price: parse_decimal(&row.try_get::<String, _>("p_price")?)?,
                is_available: row.try_get("p_is_available")?,
            }),
            None => None,
        };

        Ok(OrderItemDetail {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            price: parse_decimal(&row.try_get::<String, _>("price")?)?,
            product,
        })
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let id = snowflake_id();
        let created_at = now_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, table_id, customer_name, customer_phone, status,
                payment_method, payment_status, total, notes, created_at
            )
            VALUES (?, ?, ?, ?, 'pending', ?, 'pending', ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(data.table_id)
        .bind(&data.customer_name)
        .bind(&data.customer_phone)
        .bind(&data.payment_method)
        .bind(data.total.to_string())
        .bind(&data.notes)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for item in &data.items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(snowflake_id())
            .bind(id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id,
            table_id: data.table_id,
            customer_name: data.customer_name,
            customer_phone: data.customer_phone,
            status: Default::default(),
            payment_method: data.payment_method,
            payment_status: Default::default(),
            total: data.total,
            notes: data.notes,
            created_at,
            completed_at: None,
            deleted_at: None,
        })
    }

    async fn update(&self, id: i64, patch: OrderPatch) -> RepoResult<Option<Order>> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = COALESCE(?, status),
                payment_status = COALESCE(?, payment_status),
                payment_method = COALESCE(?, payment_method),
                customer_name = COALESCE(?, customer_name),
                customer_phone = COALESCE(?, customer_phone),
                notes = COALESCE(?, notes),
                total = COALESCE(?, total),
                completed_at = COALESCE(?, completed_at)
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.payment_status.map(|s| s.as_str()))
        .bind(&patch.payment_method)
        .bind(&patch.customer_name)
        .bind(&patch.customer_phone)
        .bind(&patch.notes)
        .bind(patch.total.map(|t| t.to_string()))
        .bind(patch.completed_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = ? AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::order_from_row).transpose()
    }

    async fn find_detail(&self, id: i64) -> RepoResult<Option<OrderDetail>> {
        let Some(order) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let rows = sqlx::query(
            r#"
            SELECT
                oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price,
                p.id AS p_id, p.name AS p_name, p.category_id AS p_category_id,
                p.price AS p_price, p.is_available AS p_is_available
            FROM order_items oi
            LEFT JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?
            ORDER BY oi.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(Self::item_from_row)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Some(OrderDetail { order, items }))
    }

    async fn find_active(&self) -> RepoResult<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM orders
            WHERE deleted_at IS NULL AND status NOT IN ('completed', 'cancelled')
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::order_from_row).collect()
    }

    async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let rows =
            sqlx::query("SELECT * FROM orders WHERE deleted_at IS NULL ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(Self::order_from_row).collect()
    }

    async fn soft_delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE orders SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
            .bind(now_millis())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
