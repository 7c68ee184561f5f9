//! Periodic maintenance task.
//!
//! Runs every K steps in a fixed order: expire stale orders, refresh the
//! unfulfilled-order cache, flush the log buffer, snapshot inventory, commit.
//! The order matters — expiry must precede the cache refresh it feeds, and
//! the flush and snapshot must describe the same instant the commit makes
//! durable.

use chrono::{DateTime, Duration, Utc};

use supplysim_store::{InventorySnapshot, SimulationStore, StoreError};

use crate::cache::UnfulfilledOrderCache;
use crate::log_buffer::FulfillmentLogBuffer;
use crate::pool::EntityPool;

/// What one maintenance pass did; feeds the scheduler's debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub expired_orders: usize,
    pub flushed_records: usize,
    pub snapshot_rows: usize,
}

pub(crate) fn run<S: SimulationStore>(
    store: &mut S,
    pool: &EntityPool,
    cache: &mut UnfulfilledOrderCache,
    buffer: &mut FulfillmentLogBuffer,
    now: DateTime<Utc>,
    expiry_days: i64,
) -> Result<MaintenanceReport, StoreError> {
    // 1. Expire orders that stayed open for at least the expiry age.
    let cutoff = now - Duration::days(expiry_days);
    let mut expired_orders = 0;
    for order in store.stale_open_orders(cutoff)? {
        if let Some(next) = order.status.expired_variant() {
            store.set_order_status(order.id, next)?;
            expired_orders += 1;
        }
    }

    // 2. Rebuild the cache from the post-expiry state.
    cache.refresh(store)?;

    // 3. Flush buffered attempt records in one batch.
    let flushed_records = buffer.flush(store)?;

    // 4. Snapshot every inventory row with its open backlog.
    let mut snapshots = Vec::new();
    for level in store.inventory_levels()? {
        let supplier = pool.supplier(level.supplier_id).ok_or_else(|| {
            StoreError::NotFound(format!("supplier {} not in pool", level.supplier_id))
        })?;
        let backlog = store.open_backlog(level.item_id, level.supplier_id)?;
        snapshots.push(InventorySnapshot {
            item_id: level.item_id,
            supplier_id: level.supplier_id,
            timestamp: now,
            quantity_on_hand: level.quantity_on_hand,
            backlog_unfulfilled_qty: backlog,
            restock_weight: level.restock_weight,
            fulfillment_weight: supplier.fulfillment_weight,
        });
    }
    let snapshot_rows = snapshots.len();
    store.append_inventory_snapshots(snapshots)?;

    // 5. Make the whole pass durable as one unit.
    store.commit()?;

    Ok(MaintenanceReport {
        expired_orders,
        flushed_records,
        snapshot_rows,
    })
}
