//! Order Lifecycle Coordinator
//!
//! Single entry point for order state changes. Every status or payment
//! transition flows through here so the cascading effects stay in one place:
//!
//! - creating an order marks its table occupied
//! - completing an order forces `payment_status = paid`, stamps
//!   `completed_at`, and materializes exactly one sale record
//! - a terminal transition releases the table when no other active order
//!   still holds it
//!
//! The order write itself is authoritative; table occupancy and sale
//! materialization are best-effort follow-ups. Their failures are logged and
//! never abort the request, and sale creation is idempotent against the
//! unique index on `sales(order_id)`.

use std::sync::Arc;

use shared::models::{
    NewOrder, NewOrderItem, NewSale, Order, OrderCreate, OrderDetail, OrderPatch, OrderStatus,
    OrderUpdate, PaymentStatus, TableStatus,
};
use shared::util::now_millis;
use shared::{AppError, AppResult, ErrorCode};

use crate::db::repository::{OrderRepository, RepoError, SaleRepository, TableRepository};
use crate::orders::money;

/// Fallback payment method for sales when the order never recorded one.
const DEFAULT_PAYMENT_METHOD: &str = "cash";

pub struct OrderLifecycle {
    orders: Arc<dyn OrderRepository>,
    tables: Arc<dyn TableRepository>,
    sales: Arc<dyn SaleRepository>,
}

impl OrderLifecycle {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        tables: Arc<dyn TableRepository>,
        sales: Arc<dyn SaleRepository>,
    ) -> Self {
        Self {
            orders,
            tables,
            sales,
        }
    }

    /// Create an order and mark its table occupied.
    ///
    /// The total is always computed server-side from the line items. The
    /// table does not have to exist; an unknown table id is logged and the
    /// order is created anyway.
    pub async fn create_order(&self, data: OrderCreate) -> AppResult<OrderDetail> {
        if data.customer_name.trim().is_empty() {
            return Err(AppError::validation("customer name is required"));
        }
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }
        for item in &data.items {
            money::validate_item(item)?;
        }

        let total = money::order_total(&data.items);
        let new_order = NewOrder {
            table_id: data.table_id,
            customer_name: data.customer_name.trim().to_string(),
            customer_phone: data.customer_phone,
            payment_method: data.payment_method,
            notes: data.notes,
            total,
            items: data
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: money::round2(item.price),
                })
                .collect(),
        };

        let order = self.orders.create(new_order).await?;
        self.occupy_table(&order).await;

        let detail = self
            .orders
            .find_detail(order.id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        Ok(detail)
    }

    /// Apply a partial update, running the lifecycle rules for any status or
    /// payment transition it carries.
    pub async fn update_order(&self, id: i64, update: OrderUpdate) -> AppResult<Order> {
        if update.is_empty() {
            return Err(AppError::validation("update carries no fields"));
        }

        let mut patch = OrderPatch::from(update);
        // Completion implies payment: a completed order is always paid and
        // carries a completion timestamp.
        if patch.status == Some(OrderStatus::Completed) {
            patch.payment_status = Some(PaymentStatus::Paid);
            patch.completed_at = Some(now_millis());
        }
        let status_change = patch.status;

        let order = self
            .orders
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        match status_change {
            Some(status) if status.is_terminal() => {
                self.recompute_table(&order).await;
            }
            Some(_) => {
                // Still holding the table.
                self.occupy_table(&order).await;
            }
            None => {}
        }

        // A completed-and-paid order always has its sale, whether completion
        // happened in this patch or an earlier one.
        if order.status == OrderStatus::Completed && order.payment_status == PaymentStatus::Paid {
            self.materialize_sale(&order).await;
        }

        Ok(order)
    }

    /// Soft-delete an order and release its table when nothing else holds it.
    pub async fn delete_order(&self, id: i64) -> AppResult<()> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if !self.orders.soft_delete(id).await? {
            return Err(AppError::new(ErrorCode::OrderNotFound));
        }

        self.recompute_table(&order).await;
        Ok(())
    }

    /// Mark the order's table occupied. Best-effort: failures and
    /// unresolvable tables are logged, never propagated.
    async fn occupy_table(&self, order: &Order) {
        match self
            .tables
            .set_status(order.table_id, TableStatus::Occupied)
            .await
        {
            Ok(false) => {
                tracing::warn!(
                    order_id = %order.id,
                    table_id = %order.table_id,
                    "Order references a table that does not exist"
                );
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    table_id = %order.table_id,
                    "Failed to mark table occupied: {e}"
                );
            }
            Ok(true) => {}
        }
    }

    /// Re-derive the occupancy of the order's table from the remaining
    /// active orders. Best-effort: failures are logged, never propagated.
    async fn recompute_table(&self, order: &Order) {
        let status = match self.orders.find_active().await {
            Ok(active) => {
                if active
                    .iter()
                    .any(|o| o.table_id == order.table_id && o.id != order.id)
                {
                    TableStatus::Occupied
                } else {
                    TableStatus::Available
                }
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    table_id = %order.table_id,
                    "Failed to load active orders for occupancy: {e}"
                );
                return;
            }
        };

        match self.tables.set_status(order.table_id, status).await {
            Ok(false) => {
                tracing::warn!(
                    order_id = %order.id,
                    table_id = %order.table_id,
                    "Order references a table that does not exist"
                );
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %order.id,
                    table_id = %order.table_id,
                    "Failed to update table occupancy: {e}"
                );
            }
            Ok(true) => {}
        }
    }

    /// Record the sale for a completed order, exactly once. Best-effort:
    /// failures are logged, never propagated.
    async fn materialize_sale(&self, order: &Order) {
        match self.sales.find_by_order_id(order.id).await {
            Ok(Some(_)) => return,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(order_id = %order.id, "Failed to check for existing sale: {e}");
                return;
            }
        }

        let description = match self.orders.find_detail(order.id).await {
            Ok(Some(detail)) => sale_description(&detail),
            Ok(None) => format!("Order #{}", order.id),
            Err(e) => {
                tracing::warn!(order_id = %order.id, "Failed to load order detail for sale: {e}");
                format!("Order #{}", order.id)
            }
        };

        let sale = NewSale {
            order_id: Some(order.id),
            amount: order.total,
            payment_method: order
                .payment_method
                .clone()
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            description,
        };

        match self.sales.create(sale).await {
            Ok(_) => {
                tracing::info!(order_id = %order.id, "Sale recorded for completed order");
            }
            // Lost the race against a concurrent completion; the sale exists.
            Err(RepoError::Duplicate(_)) => {}
            Err(e) => {
                tracing::warn!(order_id = %order.id, "Failed to record sale: {e}");
            }
        }
    }
}

fn sale_description(detail: &OrderDetail) -> String {
    let names: Vec<&str> = detail
        .items
        .iter()
        .filter_map(|item| item.product.as_ref().map(|p| p.name.as_str()))
        .collect();
    if names.is_empty() {
        format!("Order #{}", detail.order.id)
    } else {
        format!("Order #{} - {}", detail.order.id, names.join(", "))
    }
}
