//! Application state

use std::sync::Arc;

use shared::AppError;

use crate::config::Config;
use crate::db::DbService;
use crate::db::repository::{
    CategoryRepository, ExpenseRepository, OrderRepository, ProductRepository, SaleRepository,
    SqliteOrderRepository, SqliteSaleRepository, SqliteTableRepository, TableRepository,
};
use crate::orders::OrderLifecycle;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orders: Arc<dyn OrderRepository>,
    pub tables: Arc<dyn TableRepository>,
    pub sales: Arc<dyn SaleRepository>,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub expenses: ExpenseRepository,
    pub lifecycle: Arc<OrderLifecycle>,
    pub table_store: SqliteTableRepository,
}

impl AppState {
    /// Open the database, run migrations, and wire the repositories into
    /// the lifecycle coordinator.
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let pool = db.pool;

        let table_store = SqliteTableRepository::new(pool.clone());
        let orders: Arc<dyn OrderRepository> = Arc::new(SqliteOrderRepository::new(pool.clone()));
        let tables: Arc<dyn TableRepository> = Arc::new(table_store.clone());
        let sales: Arc<dyn SaleRepository> = Arc::new(SqliteSaleRepository::new(pool.clone()));

        let lifecycle = Arc::new(OrderLifecycle::new(
            orders.clone(),
            tables.clone(),
            sales.clone(),
        ));

        Ok(Self {
            config,
            orders,
            tables,
            sales,
            products: ProductRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            expenses: ExpenseRepository::new(pool),
            lifecycle,
            table_store,
        })
    }
}
