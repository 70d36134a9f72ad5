//! Sale Model
//!
//! One non-deleted sale exists per completed+paid order; manual sales carry
//! no `order_id`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sale record entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: i64,
    /// Originating order; None for manual sales
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    pub amount: Decimal,
    pub payment_method: String,
    pub description: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

/// Validated sale data handed to the sale store
#[derive(Debug, Clone)]
pub struct NewSale {
    pub order_id: Option<i64>,
    pub amount: Decimal,
    pub payment_method: String,
    pub description: String,
}

/// Manual sale request payload (bookkeeping entry, no order link)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub amount: Decimal,
    pub payment_method: Option<String>,
    pub description: String,
}
