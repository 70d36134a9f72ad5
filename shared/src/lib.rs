//! Shared types for the mesa order-management backend
//!
//! - **models**: entity structs and create/update payloads
//! - **error**: unified error codes, `AppError`, and the API response envelope
//! - **util**: timestamps and snowflake ID generation

pub mod error;
pub mod models;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
