use chrono::{DateTime, Utc};
use thiserror::Error;

use supplysim_catalog::{Item, ItemId};
use supplysim_inventory::InventoryLevel;
use supplysim_orders::{NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderStatus};
use supplysim_parties::{Customer, CustomerId, Supplier, SupplierId};

use crate::records::{FulfillmentRecord, InventorySnapshot};

/// Store operation error.
///
/// These are **infrastructure errors** (missing rows, constraint violations,
/// connectivity) as opposed to domain errors (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write would violate a storage constraint (overfill, negative stock,
    /// terminal status change).
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// An insert payload was structurally invalid (e.g. an order without lines).
    #[error("invalid insert: {0}")]
    InvalidInsert(String),

    /// The backing store is unreachable; fatal to the run.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Transactional persistence boundary for the simulation.
///
/// The engine drives everything through this trait and owns no storage of its
/// own. Implementations make no durability promise for writes until `commit`
/// is called: mutations accumulate in the store's working transaction and the
/// maintenance task's `commit` is the only durability point. A crash between
/// commits may lose the uncommitted tail, but committed state must always
/// satisfy the order/inventory invariants.
///
/// ## Write semantics
///
/// - `insert_order` is atomic: the order row and all its lines land together
///   or not at all, and an order must have at least one line (no orphans).
/// - `record_fulfillment` validates before mutating (overfill and stock
///   checks precede any write), so a returned error implies no partial
///   mutation.
/// - `set_order_status` refuses to change a terminal status; expiry is
///   monotonic.
/// - The append methods are batched, append-only inserts for the run's output
///   records.
///
/// ## Read semantics
///
/// Reads observe the working transaction (the single simulation actor must
/// see its own uncommitted writes). Implementations must return rows in a
/// deterministic order: replaying a run with the same seed has to scan
/// candidates identically.
pub trait SimulationStore {
    // ---- entity pools (seeded externally, read-only during a run) ----

    fn items(&self) -> Result<Vec<Item>, StoreError>;
    fn customers(&self) -> Result<Vec<Customer>, StoreError>;
    fn suppliers(&self) -> Result<Vec<Supplier>, StoreError>;

    // ---- orders ----

    /// Atomically insert an order (status `unfulfilled`) plus its lines
    /// (fulfilled_quantity 0) and return the assigned order id.
    fn insert_order(
        &mut self,
        customer_id: CustomerId,
        order_date: DateTime<Utc>,
        lines: &[NewOrderItem],
    ) -> Result<OrderId, StoreError>;

    fn order(&self, id: OrderId) -> Result<Order, StoreError>;

    fn order_item(&self, id: OrderItemId) -> Result<OrderItem, StoreError>;

    /// All lines of one order.
    fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError>;

    /// Lines with `fulfilled_quantity < quantity` whose parent order status
    /// is non-terminal. Feeds the unfulfilled-order cache refresh.
    fn open_order_items(&self) -> Result<Vec<OrderItem>, StoreError>;

    /// Open orders (status `unfulfilled` or `partial`) created at or before
    /// `cutoff`. Feeds the expiry sweep.
    fn stale_open_orders(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>, StoreError>;

    fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<(), StoreError>;

    /// Apply one successful fulfillment: increment the line's fulfilled
    /// quantity, stamp its fulfilled date, decrement the matching inventory
    /// row, and refresh the row's `last_updated`.
    fn record_fulfillment(
        &mut self,
        order_item_id: OrderItemId,
        quantity: u32,
        date: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // ---- inventory ----

    fn inventory_level(
        &self,
        item_id: ItemId,
        supplier_id: SupplierId,
    ) -> Result<InventoryLevel, StoreError>;

    fn inventory_levels(&self) -> Result<Vec<InventoryLevel>, StoreError>;

    /// Rows with `quantity_on_hand < reorder_point`.
    fn restock_eligible(&self) -> Result<Vec<InventoryLevel>, StoreError>;

    /// Refill a row to its `supplier_max_quantity` ceiling.
    fn restock(
        &mut self,
        item_id: ItemId,
        supplier_id: SupplierId,
        date: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Summed `quantity - fulfilled_quantity` over open lines referencing the
    /// item/supplier pair.
    fn open_backlog(&self, item_id: ItemId, supplier_id: SupplierId) -> Result<u32, StoreError>;

    // ---- append-only outputs ----

    fn append_fulfillment_records(
        &mut self,
        records: Vec<FulfillmentRecord>,
    ) -> Result<(), StoreError>;

    fn append_inventory_snapshots(
        &mut self,
        snapshots: Vec<InventorySnapshot>,
    ) -> Result<(), StoreError>;

    // ---- transaction boundary ----

    /// Make every mutation since the previous commit durable, atomically.
    fn commit(&mut self) -> Result<(), StoreError>;
}
