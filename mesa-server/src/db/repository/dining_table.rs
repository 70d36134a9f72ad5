//! Dining Table Repository

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use shared::util::snowflake_id;

use super::{RepoError, RepoResult, TableRepository};

#[derive(Clone)]
pub struct SqliteTableRepository {
    pool: SqlitePool,
}

impl SqliteTableRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> RepoResult<DiningTable> {
        Ok(DiningTable {
            id: row.try_get("id")?,
            number: row.try_get("number")?,
            capacity: row.try_get("capacity")?,
            status: row
                .try_get::<String, _>("status")?
                .parse()
                .map_err(RepoError::Database)?,
        })
    }

    pub async fn find_by_number(&self, number: i32) -> RepoResult<Option<DiningTable>> {
        let row = sqlx::query("SELECT * FROM dining_tables WHERE number = ?")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if self.find_by_number(data.number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                data.number
            )));
        }

        let table = DiningTable {
            id: snowflake_id(),
            number: data.number,
            capacity: data.capacity.unwrap_or(4),
            status: TableStatus::Available,
        };

        sqlx::query("INSERT INTO dining_tables (id, number, capacity, status) VALUES (?, ?, ?, ?)")
            .bind(table.id)
            .bind(table.number)
            .bind(table.capacity)
            .bind(table.status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(table)
    }

    /// Update a dining table (explicit admin edit; the lifecycle coordinator
    /// uses `set_status` instead)
    pub async fn update(&self, id: i64, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        if let Some(number) = data.number
            && number != existing.number
            && self.find_by_number(number).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table {} already exists",
                number
            )));
        }

        sqlx::query(
            r#"
            UPDATE dining_tables SET
                number = COALESCE(?, number),
                capacity = COALESCE(?, capacity),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(data.number)
        .bind(data.capacity)
        .bind(data.status.map(|s| s.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Hard delete a dining table; refused while orders reference it
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let (order_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM orders WHERE table_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if order_count > 0 {
            return Err(RepoError::Validation(format!(
                "Table {} is referenced by {} order(s)",
                id, order_count
            )));
        }

        let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TableRepository for SqliteTableRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<DiningTable>> {
        let row = sqlx::query("SELECT * FROM dining_tables WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let rows = sqlx::query("SELECT * FROM dining_tables ORDER BY number")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn set_status(&self, id: i64, status: TableStatus) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE dining_tables SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
