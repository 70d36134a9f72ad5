//! Order routes
//!
//! All writes go through the lifecycle coordinator; reads hit the order
//! store directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use shared::models::{Order, OrderCreate, OrderDetail, OrderUpdate};
use shared::{AppError, ErrorCode};

use super::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/active", get(list_active_orders))
        .route(
            "/api/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/api/orders/{id}/status", put(update_order))
}

async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    Ok(Json(state.orders.find_all().await?))
}

async fn list_active_orders(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    Ok(Json(state.orders.find_active().await?))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<OrderDetail> {
    let detail = state
        .orders
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(detail))
}

async fn create_order(
    State(state): State<AppState>,
    Json(data): Json<OrderCreate>,
) -> Result<(StatusCode, Json<OrderDetail>), AppError> {
    let detail = state.lifecycle.create_order(data).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<OrderUpdate>,
) -> ApiResult<Order> {
    let order = state.lifecycle.update_order(id, data).await?;
    Ok(Json(order))
}

async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.lifecycle.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
