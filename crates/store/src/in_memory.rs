use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use supplysim_catalog::{Item, ItemId};
use supplysim_core::{DomainError, EntityId};
use supplysim_inventory::InventoryLevel;
use supplysim_orders::{NewOrderItem, Order, OrderId, OrderItem, OrderItemId, OrderStatus};
use supplysim_parties::{Customer, CustomerId, Supplier, SupplierId};

use crate::records::{FulfillmentRecord, InventorySnapshot};
use crate::r#trait::{SimulationStore, StoreError};

/// Full table state at one point in the transaction lifecycle.
///
/// `BTreeMap` keeps scans in key order, which the reproducibility contract of
/// `SimulationStore` requires.
#[derive(Debug, Clone, Default)]
struct TableState {
    items: BTreeMap<ItemId, Item>,
    customers: BTreeMap<CustomerId, Customer>,
    suppliers: BTreeMap<SupplierId, Supplier>,
    inventory: BTreeMap<(ItemId, SupplierId), InventoryLevel>,
    orders: BTreeMap<OrderId, Order>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
    fulfillment_log: Vec<FulfillmentRecord>,
    inventory_history: Vec<InventorySnapshot>,
}

/// In-memory transactional store.
///
/// Intended for tests/dev. Reads and writes go to a working state; `commit`
/// copies the working state over the durable one, so the durable views always
/// show the last committed transaction.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    working: TableState,
    durable: TableState,
    next_order_id: u64,
    next_order_item_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            working: TableState::default(),
            durable: TableState::default(),
            next_order_id: 1,
            next_order_item_id: 1,
        }
    }

    // ---- seeding (initialization only; seeded rows are durable at once) ----

    pub fn seed_item(&mut self, item: Item) -> Result<(), DomainError> {
        item.validate()?;
        self.working.items.insert(item.id, item.clone());
        self.durable.items.insert(item.id, item);
        Ok(())
    }

    pub fn seed_customer(&mut self, customer: Customer) -> Result<(), DomainError> {
        customer.validate()?;
        self.working.customers.insert(customer.id, customer.clone());
        self.durable.customers.insert(customer.id, customer);
        Ok(())
    }

    pub fn seed_supplier(&mut self, supplier: Supplier) -> Result<(), DomainError> {
        supplier.validate()?;
        self.working.suppliers.insert(supplier.id, supplier.clone());
        self.durable.suppliers.insert(supplier.id, supplier);
        Ok(())
    }

    pub fn seed_inventory_level(&mut self, level: InventoryLevel) -> Result<(), DomainError> {
        level.validate()?;
        let key = (level.item_id, level.supplier_id);
        self.working.inventory.insert(key, level.clone());
        self.durable.inventory.insert(key, level);
        Ok(())
    }

    // ---- durable views (what the last commit made visible) ----

    pub fn committed_orders(&self) -> Vec<Order> {
        self.durable.orders.values().cloned().collect()
    }

    pub fn committed_order_items(&self) -> Vec<OrderItem> {
        self.durable.order_items.values().cloned().collect()
    }

    pub fn committed_inventory_levels(&self) -> Vec<InventoryLevel> {
        self.durable.inventory.values().cloned().collect()
    }

    pub fn fulfillment_log(&self) -> &[FulfillmentRecord] {
        &self.durable.fulfillment_log
    }

    pub fn inventory_history(&self) -> &[InventorySnapshot] {
        &self.durable.inventory_history
    }
}

impl SimulationStore for InMemoryStore {
    fn items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.working.items.values().cloned().collect())
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        Ok(self.working.customers.values().cloned().collect())
    }

    fn suppliers(&self) -> Result<Vec<Supplier>, StoreError> {
        Ok(self.working.suppliers.values().cloned().collect())
    }

    fn insert_order(
        &mut self,
        customer_id: CustomerId,
        order_date: DateTime<Utc>,
        lines: &[NewOrderItem],
    ) -> Result<OrderId, StoreError> {
        if lines.is_empty() {
            return Err(StoreError::InvalidInsert(
                "an order must have at least one line".to_string(),
            ));
        }
        if !self.working.customers.contains_key(&customer_id) {
            return Err(StoreError::NotFound(format!("customer {customer_id}")));
        }
        for line in lines {
            if line.quantity == 0 {
                return Err(StoreError::InvalidInsert(
                    "order line quantity must be positive".to_string(),
                ));
            }
            if !self.working.items.contains_key(&line.item_id) {
                return Err(StoreError::NotFound(format!("item {}", line.item_id)));
            }
            if !self.working.suppliers.contains_key(&line.supplier_id) {
                return Err(StoreError::NotFound(format!(
                    "supplier {}",
                    line.supplier_id
                )));
            }
        }

        let order_id = OrderId::new(EntityId::new(self.next_order_id));
        self.next_order_id += 1;

        self.working.orders.insert(
            order_id,
            Order {
                id: order_id,
                customer_id,
                order_date,
                status: OrderStatus::Unfulfilled,
            },
        );

        for line in lines {
            let id = OrderItemId::new(EntityId::new(self.next_order_item_id));
            self.next_order_item_id += 1;
            self.working.order_items.insert(
                id,
                OrderItem {
                    id,
                    order_id,
                    item_id: line.item_id,
                    supplier_id: line.supplier_id,
                    quantity: line.quantity,
                    fulfilled_quantity: 0,
                    fulfilled_date: None,
                },
            );
        }

        Ok(order_id)
    }

    fn order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.working
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))
    }

    fn order_item(&self, id: OrderItemId) -> Result<OrderItem, StoreError> {
        self.working
            .order_items
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("order item {id}")))
    }

    fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .working
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    fn open_order_items(&self) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .working
            .order_items
            .values()
            .filter(|i| !i.is_fully_fulfilled())
            .filter(|i| {
                self.working
                    .orders
                    .get(&i.order_id)
                    .is_some_and(|o| o.status.is_open())
            })
            .cloned()
            .collect())
    }

    fn stale_open_orders(&self, cutoff: DateTime<Utc>) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .working
            .orders
            .values()
            .filter(|o| o.status.is_open() && o.order_date <= cutoff)
            .cloned()
            .collect())
    }

    fn set_order_status(&mut self, id: OrderId, status: OrderStatus) -> Result<(), StoreError> {
        let order = self
            .working
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        if order.status.is_terminal() && status != order.status {
            return Err(StoreError::ConstraintViolation(format!(
                "order {id} status is terminal ({}) and cannot change",
                order.status
            )));
        }
        order.status = status;
        Ok(())
    }

    fn record_fulfillment(
        &mut self,
        order_item_id: OrderItemId,
        quantity: u32,
        date: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if quantity == 0 {
            return Err(StoreError::ConstraintViolation(
                "fulfillment quantity must be positive".to_string(),
            ));
        }

        // Validate both rows before touching either, so an error means no
        // partial mutation.
        let line = self
            .working
            .order_items
            .get(&order_item_id)
            .ok_or_else(|| StoreError::NotFound(format!("order item {order_item_id}")))?;
        if line.fulfilled_quantity + quantity > line.quantity {
            return Err(StoreError::ConstraintViolation(format!(
                "order item {order_item_id} would be overfilled ({} + {quantity} > {})",
                line.fulfilled_quantity, line.quantity
            )));
        }

        let key = (line.item_id, line.supplier_id);
        let level = self
            .working
            .inventory
            .get(&key)
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "inventory level for item {} / supplier {}",
                    key.0, key.1
                ))
            })?;
        if level.quantity_on_hand < quantity {
            return Err(StoreError::ConstraintViolation(format!(
                "inventory for item {} / supplier {} would go negative ({} - {quantity})",
                key.0, key.1, level.quantity_on_hand
            )));
        }

        let line = self
            .working
            .order_items
            .get_mut(&order_item_id)
            .expect("validated above");
        line.fulfilled_quantity += quantity;
        line.fulfilled_date = Some(date);

        let level = self.working.inventory.get_mut(&key).expect("validated above");
        level.quantity_on_hand -= quantity;
        level.last_updated = date;

        Ok(())
    }

    fn inventory_level(
        &self,
        item_id: ItemId,
        supplier_id: SupplierId,
    ) -> Result<InventoryLevel, StoreError> {
        self.working
            .inventory
            .get(&(item_id, supplier_id))
            .cloned()
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "inventory level for item {item_id} / supplier {supplier_id}"
                ))
            })
    }

    fn inventory_levels(&self) -> Result<Vec<InventoryLevel>, StoreError> {
        Ok(self.working.inventory.values().cloned().collect())
    }

    fn restock_eligible(&self) -> Result<Vec<InventoryLevel>, StoreError> {
        Ok(self
            .working
            .inventory
            .values()
            .filter(|l| l.is_restock_eligible())
            .cloned()
            .collect())
    }

    fn restock(
        &mut self,
        item_id: ItemId,
        supplier_id: SupplierId,
        date: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let level = self
            .working
            .inventory
            .get_mut(&(item_id, supplier_id))
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "inventory level for item {item_id} / supplier {supplier_id}"
                ))
            })?;
        level.quantity_on_hand = level.supplier_max_quantity;
        level.last_updated = date;
        Ok(())
    }

    fn open_backlog(&self, item_id: ItemId, supplier_id: SupplierId) -> Result<u32, StoreError> {
        Ok(self
            .working
            .order_items
            .values()
            .filter(|i| i.item_id == item_id && i.supplier_id == supplier_id)
            .filter(|i| !i.is_fully_fulfilled())
            .filter(|i| {
                self.working
                    .orders
                    .get(&i.order_id)
                    .is_some_and(|o| o.status.is_open())
            })
            .map(|i| i.remaining())
            .sum())
    }

    fn append_fulfillment_records(
        &mut self,
        records: Vec<FulfillmentRecord>,
    ) -> Result<(), StoreError> {
        self.working.fulfillment_log.extend(records);
        Ok(())
    }

    fn append_inventory_snapshots(
        &mut self,
        snapshots: Vec<InventorySnapshot>,
    ) -> Result<(), StoreError> {
        self.working.inventory_history.extend(snapshots);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.durable = self.working.clone();
        Ok(())
    }
}
