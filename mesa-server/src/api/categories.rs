//! Category routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use shared::models::{Category, CategoryCreate};
use shared::{AppError, ErrorCode};

use super::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/{id}", axum::routing::delete(delete_category))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    Ok(Json(state.categories.find_all().await?))
}

async fn create_category(
    State(state): State<AppState>,
    Json(data): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = state.categories.create(data).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.categories.delete(id).await? {
        return Err(AppError::new(ErrorCode::NotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}
