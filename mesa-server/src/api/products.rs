//! Product routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::{AppError, ErrorCode};

use super::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    Ok(Json(state.products.find_all().await?))
}

async fn get_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Product> {
    let product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotFound))?;
    Ok(Json(product))
}

async fn create_product(
    State(state): State<AppState>,
    Json(data): Json<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products.create(data).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductUpdate>,
) -> ApiResult<Product> {
    let product = state
        .products
        .update(id, data)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotFound))?;
    Ok(Json(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.products.delete(id).await? {
        return Err(AppError::new(ErrorCode::NotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}
