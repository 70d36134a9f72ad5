//! Expense routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use shared::models::{Expense, ExpenseCreate};
use shared::{AppError, ErrorCode};

use super::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/{id}", axum::routing::delete(delete_expense))
}

async fn list_expenses(State(state): State<AppState>) -> ApiResult<Vec<Expense>> {
    Ok(Json(state.expenses.find_all().await?))
}

async fn create_expense(
    State(state): State<AppState>,
    Json(data): Json<ExpenseCreate>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = state.expenses.create(data).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.expenses.soft_delete(id).await? {
        return Err(AppError::new(ErrorCode::NotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}
