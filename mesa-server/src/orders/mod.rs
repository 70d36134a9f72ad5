//! Order Domain
//!
//! Lifecycle coordination and monetary rules for orders.

pub mod lifecycle;
pub mod money;


pub use lifecycle::OrderLifecycle;
