//! Product Repository

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::snowflake_id;

use super::{RepoError, RepoResult, parse_decimal};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> RepoResult<Product> {
        Ok(Product {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category_id: row.try_get("category_id")?,
            price: parse_decimal(&row.try_get::<String, _>("price")?)?,
            is_available: row.try_get("is_available")?,
        })
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("product name is required".into()));
        }
        if data.price < Decimal::ZERO {
            return Err(RepoError::Validation(
                "product price cannot be negative".into(),
            ));
        }

        let product = Product {
            id: snowflake_id(),
            name: data.name.trim().to_string(),
            category_id: data.category_id,
            price: data.price,
            is_available: data.is_available.unwrap_or(true),
        };

        sqlx::query(
            r#"
            INSERT INTO products (id, name, category_id, price, is_available)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.category_id)
        .bind(product.price.to_string())
        .bind(product.is_available)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn update(&self, id: i64, data: ProductUpdate) -> RepoResult<Option<Product>> {
        if let Some(price) = data.price
            && price < Decimal::ZERO
        {
            return Err(RepoError::Validation(
                "product price cannot be negative".into(),
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                category_id = COALESCE(?, category_id),
                price = COALESCE(?, price),
                is_available = COALESCE(?, is_available)
            WHERE id = ?
            "#,
        )
        .bind(data.name)
        .bind(data.category_id)
        .bind(data.price.map(|p| p.to_string()))
        .bind(data.is_available)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::from_row).collect()
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
