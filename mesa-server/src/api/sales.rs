//! Sale routes
//!
//! Sales are normally materialized by the order lifecycle; the POST route
//! exists for manual bookkeeping entries with no order link.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use rust_decimal::Decimal;
use shared::models::{NewSale, Sale, SaleCreate};
use shared::{AppError, ErrorCode};

use super::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/sales", get(list_sales).post(create_sale))
        .route("/api/sales/{id}", axum::routing::delete(delete_sale))
}

async fn list_sales(State(state): State<AppState>) -> ApiResult<Vec<Sale>> {
    Ok(Json(state.sales.find_all().await?))
}

async fn create_sale(
    State(state): State<AppState>,
    Json(data): Json<SaleCreate>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    if data.amount <= Decimal::ZERO {
        return Err(AppError::validation("sale amount must be positive"));
    }
    if data.description.trim().is_empty() {
        return Err(AppError::validation("sale description is required"));
    }

    let sale = state
        .sales
        .create(NewSale {
            order_id: None,
            amount: data.amount,
            payment_method: data.payment_method.unwrap_or_else(|| "cash".to_string()),
            description: data.description.trim().to_string(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.sales.soft_delete(id).await? {
        return Err(AppError::new(ErrorCode::NotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}
