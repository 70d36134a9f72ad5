//! Repository Module
//!
//! Per-entity repositories over the SQLite pool. The three entities the order
//! lifecycle touches (orders, tables, sales) sit behind dyn-safe traits so the
//! coordinator can be exercised against in-memory fakes; the remaining catalog
//! and bookkeeping repositories are plain structs.

pub mod category;
pub mod dining_table;
pub mod expense;
pub mod order;
pub mod product;
pub mod sale;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::SqliteTableRepository;
pub use expense::ExpenseRepository;
pub use order::SqliteOrderRepository;
pub use product::ProductRepository;
pub use sale::SqliteSaleRepository;

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::AppError;
use shared::models::{
    DiningTable, NewOrder, NewSale, Order, OrderDetail, OrderPatch, Sale, TableStatus,
};
use std::str::FromStr;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation)
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => {
                AppError::with_message(shared::ErrorCode::NotFound, msg)
            }
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a TEXT money column back into a Decimal
pub(crate) fn parse_decimal(value: &str) -> RepoResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| RepoError::Database(format!("invalid decimal '{}': {}", value, e)))
}

/// Order persistence consumed by the lifecycle coordinator
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order together with its line item snapshots
    async fn create(&self, data: NewOrder) -> RepoResult<Order>;

    /// Apply a partial patch; only present fields are written. Returns None
    /// when no live (non-soft-deleted) order has this id.
    async fn update(&self, id: i64, patch: OrderPatch) -> RepoResult<Option<Order>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>>;

    /// Order plus its items joined with their products
    async fn find_detail(&self, id: i64) -> RepoResult<Option<OrderDetail>>;

    /// Non-deleted orders still holding a table (status not terminal)
    async fn find_active(&self) -> RepoResult<Vec<Order>>;

    async fn find_all(&self) -> RepoResult<Vec<Order>>;

    /// Soft delete; returns false when no live order has this id
    async fn soft_delete(&self, id: i64) -> RepoResult<bool>;
}

/// Table persistence consumed by the lifecycle coordinator
#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<DiningTable>>;

    async fn find_all(&self) -> RepoResult<Vec<DiningTable>>;

    /// Returns false when no table has this id
    async fn set_status(&self, id: i64, status: TableStatus) -> RepoResult<bool>;
}

/// Sale persistence consumed by the lifecycle coordinator
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Persist a sale; a second live sale for the same order surfaces as
    /// `RepoError::Duplicate` (unique index on order_id)
    async fn create(&self, data: NewSale) -> RepoResult<Sale>;

    async fn find_by_order_id(&self, order_id: i64) -> RepoResult<Option<Sale>>;

    async fn find_all(&self) -> RepoResult<Vec<Sale>>;

    async fn soft_delete(&self, id: i64) -> RepoResult<bool>;
}
