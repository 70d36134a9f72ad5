//! Monetary validation and totals for order items.
//!
//! All amounts are `rust_decimal::Decimal` rounded to 2 decimal places with
//! midpoint-away-from-zero. Totals are computed server-side from the stored
//! line items; client-supplied totals are never trusted.

use rust_decimal::{Decimal, RoundingStrategy};

use shared::models::OrderItemInput;
use shared::{AppError, AppResult};

/// Upper bound on a single line item price.
pub const MAX_PRICE: i64 = 1_000_000;

/// Upper bound on a single line item quantity.
pub const MAX_QUANTITY: i32 = 9_999;

/// Round to 2 decimal places, midpoint away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a single line item before it reaches storage.
pub fn validate_item(item: &OrderItemInput) -> AppResult<()> {
    if item.quantity < 1 {
        return Err(AppError::validation("item quantity must be at least 1"));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(AppError::validation("item quantity exceeds the maximum"));
    }
    if item.price < Decimal::ZERO {
        return Err(AppError::validation("item price cannot be negative"));
    }
    if item.price > Decimal::from(MAX_PRICE) {
        return Err(AppError::validation("item price exceeds the maximum"));
    }
    Ok(())
}

/// Sum of `price * quantity` over all items, rounded to 2 decimal places.
pub fn order_total(items: &[OrderItemInput]) -> Decimal {
    let sum: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    round2(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Decimal, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            product_id: 1,
            quantity,
            price,
        }
    }

    #[test]
    fn total_sums_lines() {
        // 4.50 * 3 + 2.00 = 15.50
        let items = vec![item(Decimal::new(450, 2), 3), item(Decimal::new(200, 2), 1)];
        assert_eq!(order_total(&items), Decimal::new(1550, 2));
    }

    #[test]
    fn total_rounds_midpoint_away_from_zero() {
        // 0.335 -> 0.34
        let items = vec![item(Decimal::new(335, 3), 1)];
        assert_eq!(order_total(&items), Decimal::new(34, 2));
    }

    #[test]
    fn rejects_zero_quantity() {
        assert!(validate_item(&item(Decimal::ONE, 0)).is_err());
    }

    #[test]
    fn rejects_negative_price() {
        assert!(validate_item(&item(Decimal::new(-1, 2), 1)).is_err());
    }

    #[test]
    fn accepts_free_item() {
        assert!(validate_item(&item(Decimal::ZERO, 1)).is_ok());
    }

    #[test]
    fn rejects_absurd_price() {
        assert!(validate_item(&item(Decimal::from(MAX_PRICE + 1), 1)).is_err());
    }

    #[test]
    fn rejects_absurd_quantity() {
        assert!(validate_item(&item(Decimal::ONE, MAX_QUANTITY + 1)).is_err());
    }
}
