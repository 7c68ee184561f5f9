use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplysim_catalog::ItemId;
use supplysim_core::EntityId;
use supplysim_parties::{CustomerId, SupplierId};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(EntityId::new(value))
    }
}

/// Order line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemId(pub EntityId);

impl OrderItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for OrderItemId {
    fn from(value: u64) -> Self {
        Self(EntityId::new(value))
    }
}

/// Order status lifecycle.
///
/// `Expired` and `PartialExpired` are terminal; an order reaches them only
/// through the maintenance expiry sweep and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Unfulfilled,
    Partial,
    Fulfilled,
    Expired,
    PartialExpired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unfulfilled => "unfulfilled",
            OrderStatus::Partial => "partial",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Expired => "expired",
            OrderStatus::PartialExpired => "partial-expired",
        }
    }

    /// Terminal statuses accept no further fulfillment and no expiry.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Fulfilled | OrderStatus::Expired | OrderStatus::PartialExpired
        )
    }

    /// Open orders are still eligible for fulfillment attempts and expiry.
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    /// The terminal status an open order expires into, if any.
    ///
    /// `unfulfilled → expired`, `partial → partial-expired`; terminal statuses
    /// (and `fulfilled`) have no expired variant.
    pub fn expired_variant(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Unfulfilled => Some(OrderStatus::Expired),
            OrderStatus::Partial => Some(OrderStatus::PartialExpired),
            _ => None,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order placed by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    /// Simulated creation date; drives expiry.
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    /// Age of the order at the given simulated instant, in whole days.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.order_date).num_days()
    }
}

/// One line of an order: an item sourced from one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub item_id: ItemId,
    pub supplier_id: SupplierId,
    pub quantity: u32,
    /// Always `<= quantity`.
    pub fulfilled_quantity: u32,
    pub fulfilled_date: Option<DateTime<Utc>>,
}

impl OrderItem {
    /// Quantity still needed to complete this line.
    pub fn remaining(&self) -> u32 {
        self.quantity - self.fulfilled_quantity
    }

    pub fn is_fully_fulfilled(&self) -> bool {
        self.fulfilled_quantity == self.quantity
    }
}

/// Payload for one line of a not-yet-inserted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub item_id: ItemId,
    pub supplier_id: SupplierId,
    pub quantity: u32,
}

/// Derive an order's non-terminal status from its lines.
///
/// `fulfilled` iff every line is fully fulfilled; `partial` iff at least one
/// line is fully fulfilled and at least one is not; `unfulfilled` otherwise.
/// A line that is only partially filled does not by itself move the order out
/// of `unfulfilled`.
pub fn derive_status(items: &[OrderItem]) -> OrderStatus {
    let total = items.len();
    let complete = items.iter().filter(|i| i.is_fully_fulfilled()).count();

    if total > 0 && complete == total {
        OrderStatus::Fulfilled
    } else if complete > 0 {
        OrderStatus::Partial
    } else {
        OrderStatus::Unfulfilled
    }
}
