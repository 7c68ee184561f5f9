//! Fulfillment attempt event.

use chrono::{DateTime, Utc};

use supplysim_orders::derive_status;
use supplysim_store::{FailureReason, FulfillmentRecord, SimulationStore, StoreError};

use crate::cache::UnfulfilledOrderCache;
use crate::error::{HandlerOutcome, NoOpReason};
use crate::log_buffer::FulfillmentLogBuffer;
use crate::pool::EntityPool;
use crate::rng::RandomSource;

/// Attempt to fulfill one cached order line.
///
/// Stock is checked before the supplier reliability draw, so an out-of-stock
/// attempt consumes no randomness. A successful attempt fills
/// `min(remaining, on_hand)` — partial fills within one attempt are normal —
/// then re-derives the parent order's status and immediately evicts the line
/// from the cache if it is now complete. Every attempt appends exactly one
/// log record.
pub(crate) fn handle<S, R>(
    store: &mut S,
    pool: &EntityPool,
    cache: &mut UnfulfilledOrderCache,
    buffer: &mut FulfillmentLogBuffer,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<HandlerOutcome, StoreError>
where
    S: SimulationStore,
    R: RandomSource,
{
    let Some(candidate) = cache.sample(rng) else {
        buffer.append(FulfillmentRecord::no_candidate(now));
        return Ok(HandlerOutcome::NoOp(NoOpReason::EmptyCache));
    };

    // The cache only carries identity; quantities come from the store.
    let line = store.order_item(candidate.order_item_id)?;
    let supplier = pool.supplier(candidate.supplier_id).ok_or_else(|| {
        StoreError::NotFound(format!("supplier {} not in pool", candidate.supplier_id))
    })?;
    let level = store.inventory_level(candidate.item_id, candidate.supplier_id)?;

    if level.quantity_on_hand == 0 {
        buffer.append(FulfillmentRecord::failure(
            candidate.order_id,
            candidate.order_item_id,
            candidate.item_id,
            candidate.supplier_id,
            now,
            FailureReason::OutOfStock,
        ));
        return Ok(HandlerOutcome::Applied);
    }

    if rng.bernoulli(supplier.failure_rate) {
        buffer.append(FulfillmentRecord::failure(
            candidate.order_id,
            candidate.order_item_id,
            candidate.item_id,
            candidate.supplier_id,
            now,
            FailureReason::SupplierFailure,
        ));
        return Ok(HandlerOutcome::Applied);
    }

    let quantity = line.remaining().min(level.quantity_on_hand);
    store.record_fulfillment(candidate.order_item_id, quantity, now)?;

    let order = store.order(candidate.order_id)?;
    let derived = derive_status(&store.order_items(candidate.order_id)?);
    if order.status.is_open() && derived != order.status {
        store.set_order_status(candidate.order_id, derived)?;
    }

    if quantity == line.remaining() {
        // Line complete: never let it be sampled again, even before the next
        // refresh.
        cache.evict(candidate.order_item_id);
    }

    buffer.append(FulfillmentRecord::success(
        candidate.order_id,
        candidate.order_item_id,
        candidate.item_id,
        candidate.supplier_id,
        now,
        quantity,
    ));
    Ok(HandlerOutcome::Applied)
}
