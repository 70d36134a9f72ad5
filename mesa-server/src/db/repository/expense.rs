//! Expense Repository

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use shared::models::{Expense, ExpenseCreate};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult, parse_decimal};

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow) -> RepoResult<Expense> {
        Ok(Expense {
            id: row.try_get("id")?,
            amount: parse_decimal(&row.try_get::<String, _>("amount")?)?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            created_at: row.try_get("created_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    pub async fn create(&self, data: ExpenseCreate) -> RepoResult<Expense> {
        if data.amount <= Decimal::ZERO {
            return Err(RepoError::Validation(
                "expense amount must be positive".into(),
            ));
        }
        if data.description.trim().is_empty() {
            return Err(RepoError::Validation(
                "expense description is required".into(),
            ));
        }

        let expense = Expense {
            id: snowflake_id(),
            amount: data.amount,
            description: data.description.trim().to_string(),
            category: data.category,
            created_at: now_millis(),
            deleted_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO expenses (id, amount, description, category, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.id)
        .bind(expense.amount.to_string())
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Expense>> {
        let rows =
            sqlx::query("SELECT * FROM expenses WHERE deleted_at IS NULL ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(Self::from_row).collect()
    }

    pub async fn soft_delete(&self, id: i64) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE expenses SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(now_millis())
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
