//! Dining table routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::{AppError, ErrorCode};

use super::ApiResult;
use crate::db::repository::TableRepository;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tables", get(list_tables).post(create_table))
        .route(
            "/api/tables/{id}",
            get(get_table).put(update_table).delete(delete_table),
        )
}

async fn list_tables(State(state): State<AppState>) -> ApiResult<Vec<DiningTable>> {
    Ok(Json(state.tables.find_all().await?))
}

async fn get_table(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<DiningTable> {
    let table = state
        .tables
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::TableNotFound))?;
    Ok(Json(table))
}

async fn create_table(
    State(state): State<AppState>,
    Json(data): Json<DiningTableCreate>,
) -> Result<(StatusCode, Json<DiningTable>), AppError> {
    let table = state.table_store.create(data).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

async fn update_table(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<DiningTableUpdate>,
) -> ApiResult<DiningTable> {
    let table = state.table_store.update(id, data).await?;
    Ok(Json(table))
}

async fn delete_table(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.table_store.delete(id).await? {
        return Err(AppError::new(ErrorCode::TableNotFound));
    }
    Ok(StatusCode::NO_CONTENT)
}
