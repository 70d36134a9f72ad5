//! mesa-server — restaurant order management service
//!
//! HTTP API over a SQLite store. Orders flow through a lifecycle
//! coordinator that keeps table occupancy and the sales ledger consistent
//! with order state.

pub mod api;
pub mod config;
pub mod db;
pub mod orders;
pub mod state;

pub use config::Config;
pub use state::AppState;
