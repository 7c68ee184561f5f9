//! Unfulfilled-order cache.
//!
//! In-memory index of order lines still eligible for fulfillment attempts,
//! so a step never scans the full order table. Staleness is bounded: a line
//! completed by a fulfillment attempt is evicted immediately, while newly
//! created orders only appear at the next maintenance refresh.

use std::collections::HashMap;

use supplysim_catalog::ItemId;
use supplysim_orders::{OrderId, OrderItemId};
use supplysim_parties::SupplierId;
use supplysim_store::{SimulationStore, StoreError};

use crate::rng::RandomSource;

/// Identity of one attemptable order line.
///
/// Quantities are deliberately not cached; the fulfillment handler re-reads
/// them from the store at attempt time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub order_id: OrderId,
    pub order_item_id: OrderItemId,
    pub item_id: ItemId,
    pub supplier_id: SupplierId,
}

/// Uniform-sampling index over open order lines.
#[derive(Debug, Default)]
pub struct UnfulfilledOrderCache {
    candidates: Vec<Candidate>,
    positions: HashMap<OrderItemId, usize>,
}

impl UnfulfilledOrderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload every open order line (not fully fulfilled, parent status
    /// non-terminal) from the store.
    pub fn refresh<S: SimulationStore>(&mut self, store: &S) -> Result<(), StoreError> {
        let open = store.open_order_items()?;
        self.candidates.clear();
        self.positions.clear();
        for line in open {
            self.positions.insert(line.id, self.candidates.len());
            self.candidates.push(Candidate {
                order_id: line.order_id,
                order_item_id: line.id,
                item_id: line.item_id,
                supplier_id: line.supplier_id,
            });
        }
        Ok(())
    }

    /// One candidate uniformly at random, or `None` when the cache is empty.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> Option<Candidate> {
        if self.candidates.is_empty() {
            return None;
        }
        Some(self.candidates[rng.index(self.candidates.len())])
    }

    /// Drop a line that is no longer attemptable. Called the moment a
    /// fulfillment attempt completes a line, not at the next refresh.
    pub fn evict(&mut self, id: OrderItemId) {
        let Some(position) = self.positions.remove(&id) else {
            return;
        };
        self.candidates.swap_remove(position);
        if let Some(moved) = self.candidates.get(position) {
            self.positions.insert(moved.order_item_id, position);
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
