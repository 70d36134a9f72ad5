//! Category Repository

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shared::models::{Category, CategoryCreate};
use shared::util::snowflake_id;

use super::{RepoError, RepoResult};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> RepoResult<Category> {
        Ok(Category {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("category name is required".into()));
        }

        let category = Category {
            id: snowflake_id(),
            name: data.name.trim().to_string(),
        };

        sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
            .bind(category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::from_row).collect()
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        // Products keep their rows; the FK sets category_id to NULL.
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
