//! Sale Repository
//!
//! A partial unique index on `sales(order_id)` guards against two live sales
//! for the same order; the violation surfaces as `RepoError::Duplicate` and
//! callers treat it as "already materialized".

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shared::models::{NewSale, Sale};
use shared::util::{now_millis, snowflake_id};

use super::{RepoResult, SaleRepository, parse_decimal};

#[derive(Clone)]
pub struct SqliteSaleRepository {
    pool: SqlitePool,
}

impl SqliteSaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> RepoResult<Sale> {
        Ok(Sale {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            amount: parse_decimal(&row.try_get::<String, _>("amount")?)?,
            payment_method: row.try_get("payment_method")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

#[async_trait]
impl SaleRepository for SqliteSaleRepository {
    async fn create(&self, data: NewSale) -> RepoResult<Sale> {
        let sale = Sale {
            id: snowflake_id(),
            order_id: data.order_id,
            amount: data.amount,
            payment_method: data.payment_method,
            description: data.description,
            created_at: now_millis(),
            deleted_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (id, order_id, amount, payment_method, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.id)
        .bind(sale.order_id)
        .bind(sale.amount.to_string())
        .bind(&sale.payment_method)
        .bind(&sale.description)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(sale)
    }

    async fn find_by_order_id(&self, order_id: i64) -> RepoResult<Option<Sale>> {
        let row = sqlx::query("SELECT * FROM sales WHERE order_id = ? AND deleted_at IS NULL")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_all(&self) -> RepoResult<Vec<Sale>> {
        let rows =
            sqlx::query("SELECT * FROM sales WHERE deleted_at IS NULL ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn soft_delete(&self, id: i64) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE sales SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(now_millis())
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
