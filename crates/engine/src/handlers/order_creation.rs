//! Order creation event.

use chrono::{DateTime, Utc};

use supplysim_orders::NewOrderItem;
use supplysim_store::{SimulationStore, StoreError};

use crate::config::SimulationConfig;
use crate::error::{HandlerOutcome, NoOpReason};
use crate::pool::EntityPool;
use crate::rng::RandomSource;

/// Create one order for a random customer with 1..=N distinct items, each
/// line bound to a supplier stocking the item's category (weighted by
/// fulfillment weight).
///
/// Items without an eligible supplier are skipped; if no line survives, the
/// whole creation is abandoned as a recoverable no-op and nothing is written.
pub(crate) fn handle<S, R>(
    store: &mut S,
    pool: &EntityPool,
    config: &SimulationConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<HandlerOutcome, StoreError>
where
    S: SimulationStore,
    R: RandomSource,
{
    let customer = pool.random_customer(rng);

    let item_count =
        (rng.uniform_u32(1, config.max_items_per_order) as usize).min(pool.items().len());
    let mut picked: Vec<usize> = Vec::with_capacity(item_count);
    while picked.len() < item_count {
        let index = rng.index(pool.items().len());
        if !picked.contains(&index) {
            picked.push(index);
        }
    }

    let mut lines = Vec::with_capacity(item_count);
    for index in picked {
        let item = &pool.items()[index];
        let eligible = pool.eligible_suppliers(&item.category);
        if eligible.is_empty() {
            continue;
        }
        let weights: Vec<f64> = eligible.iter().map(|(_, weight)| *weight).collect();
        let Some(choice) = rng.weighted(&weights) else {
            continue;
        };
        lines.push(NewOrderItem {
            item_id: item.id,
            supplier_id: eligible[choice].0,
            quantity: rng.uniform_u32(1, config.max_quantity_per_line),
        });
    }

    if lines.is_empty() {
        return Ok(HandlerOutcome::NoOp(NoOpReason::NoEligibleSupplier));
    }

    store.insert_order(customer.id, now, &lines)?;
    Ok(HandlerOutcome::Applied)
}
