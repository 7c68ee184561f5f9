//! Orders domain module.
//!
//! This crate contains business rules for orders and order lines, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod order;

pub use order::{
    derive_status, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderStatus,
};
