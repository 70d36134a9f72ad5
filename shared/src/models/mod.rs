//! Entity models and create/update payloads

pub mod category;
pub mod dining_table;
pub mod expense;
pub mod order;
pub mod product;
pub mod sale;

pub use category::{Category, CategoryCreate};
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use expense::{Expense, ExpenseCreate};
pub use order::{
    NewOrder, NewOrderItem, Order, OrderCreate, OrderDetail, OrderItem, OrderItemDetail,
    OrderItemInput, OrderPatch, OrderStatus, OrderUpdate, PaymentStatus,
};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use sale::{NewSale, Sale, SaleCreate};
