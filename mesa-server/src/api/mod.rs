//! HTTP API
//!
//! Route registration and the tower middleware stack.

use axum::{Json, Router};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use shared::AppError;

use crate::state::AppState;

pub mod categories;
pub mod expenses;
pub mod health;
pub mod orders;
pub mod products;
pub mod sales;
pub mod tables;

/// Handler return type: JSON body or a structured error response
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(tables::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(sales::router())
        .merge(expenses::router())
        .merge(health::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: AppState) -> Router {
    build_router()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
