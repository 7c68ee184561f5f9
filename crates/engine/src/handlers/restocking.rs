//! Restocking event.

use chrono::{DateTime, Utc};

use supplysim_store::{SimulationStore, StoreError};

use crate::config::{RestockGranularity, SimulationConfig};
use crate::error::{HandlerOutcome, NoOpReason};
use crate::rng::RandomSource;

/// Consider restock-eligible inventory rows (stock below reorder point).
///
/// Per configured granularity, either one uniformly chosen eligible row or
/// every eligible row draws Bernoulli(`restock_weight`); a success refills
/// the row to `supplier_max_quantity`. The restock weight is the dominant
/// lever on downstream fulfillment rate, which is why it is a first-class
/// per-row parameter rather than a derived constant.
pub(crate) fn handle<S, R>(
    store: &mut S,
    config: &SimulationConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<HandlerOutcome, StoreError>
where
    S: SimulationStore,
    R: RandomSource,
{
    let eligible = store.restock_eligible()?;
    if eligible.is_empty() {
        return Ok(HandlerOutcome::NoOp(NoOpReason::NothingToRestock));
    }

    match config.restock_granularity {
        RestockGranularity::SingleRandom => {
            let level = &eligible[rng.index(eligible.len())];
            if rng.bernoulli(level.restock_weight) {
                store.restock(level.item_id, level.supplier_id, now)?;
            }
        }
        RestockGranularity::AllEligible => {
            for level in &eligible {
                if rng.bernoulli(level.restock_weight) {
                    store.restock(level.item_id, level.supplier_id, now)?;
                }
            }
        }
    }

    Ok(HandlerOutcome::Applied)
}
