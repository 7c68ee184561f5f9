//! Append-only output records produced by the simulation.
//!
//! These are the rows downstream analysis consumes; the engine only appends
//! them in batches, never reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplysim_catalog::ItemId;
use supplysim_orders::{OrderId, OrderItemId};
use supplysim_parties::SupplierId;

/// Outcome of a single fulfillment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptOutcome {
    Success,
    Failure,
}

/// Why a fulfillment attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The inventory row had no stock at attempt time.
    OutOfStock,
    /// The supplier's reliability draw failed despite available stock.
    SupplierFailure,
    /// The unfulfilled-order cache had no candidate to attempt.
    NoCandidate,
}

/// One fulfillment attempt, successful or not.
///
/// Entity ids are absent only for `no_candidate` records, where there was no
/// order line to attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentRecord {
    pub order_id: Option<OrderId>,
    pub order_item_id: Option<OrderItemId>,
    pub item_id: Option<ItemId>,
    pub supplier_id: Option<SupplierId>,
    /// Simulated time of the attempt.
    pub timestamp: DateTime<Utc>,
    pub outcome: AttemptOutcome,
    /// Quantity fulfilled by this attempt (0 on failure).
    pub fulfilled_amount: u32,
    pub failure_reason: Option<FailureReason>,
}

impl FulfillmentRecord {
    /// Record for an attempt that found no candidate order line.
    pub fn no_candidate(timestamp: DateTime<Utc>) -> Self {
        Self {
            order_id: None,
            order_item_id: None,
            item_id: None,
            supplier_id: None,
            timestamp,
            outcome: AttemptOutcome::Failure,
            fulfilled_amount: 0,
            failure_reason: Some(FailureReason::NoCandidate),
        }
    }

    /// Record for a successful (possibly partial) fill.
    pub fn success(
        order_id: OrderId,
        order_item_id: OrderItemId,
        item_id: ItemId,
        supplier_id: SupplierId,
        timestamp: DateTime<Utc>,
        fulfilled_amount: u32,
    ) -> Self {
        Self {
            order_id: Some(order_id),
            order_item_id: Some(order_item_id),
            item_id: Some(item_id),
            supplier_id: Some(supplier_id),
            timestamp,
            outcome: AttemptOutcome::Success,
            fulfilled_amount,
            failure_reason: None,
        }
    }

    /// Record for an attempt that failed without mutating any entity.
    pub fn failure(
        order_id: OrderId,
        order_item_id: OrderItemId,
        item_id: ItemId,
        supplier_id: SupplierId,
        timestamp: DateTime<Utc>,
        reason: FailureReason,
    ) -> Self {
        Self {
            order_id: Some(order_id),
            order_item_id: Some(order_item_id),
            item_id: Some(item_id),
            supplier_id: Some(supplier_id),
            timestamp,
            outcome: AttemptOutcome::Failure,
            fulfilled_amount: 0,
            failure_reason: Some(reason),
        }
    }
}

/// Point-in-time stock position for one item/supplier pair.
///
/// `backlog_unfulfilled_qty` is the summed remaining quantity over open order
/// lines referencing the pair; the weight columns are carried along for
/// downstream modeling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub item_id: ItemId,
    pub supplier_id: SupplierId,
    /// Simulated time the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    pub quantity_on_hand: u32,
    pub backlog_unfulfilled_qty: u32,
    pub restock_weight: f64,
    pub fulfillment_weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn failure_reasons_serialize_to_snake_case_tags() {
        let json = serde_json::to_string(&FailureReason::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");
        let json = serde_json::to_string(&FailureReason::SupplierFailure).unwrap();
        assert_eq!(json, "\"supplier_failure\"");
        let json = serde_json::to_string(&FailureReason::NoCandidate).unwrap();
        assert_eq!(json, "\"no_candidate\"");
    }

    #[test]
    fn no_candidate_record_carries_no_entity_ids() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = FulfillmentRecord::no_candidate(ts);
        assert_eq!(record.order_id, None);
        assert_eq!(record.order_item_id, None);
        assert_eq!(record.outcome, AttemptOutcome::Failure);
        assert_eq!(record.fulfilled_amount, 0);
        assert_eq!(record.failure_reason, Some(FailureReason::NoCandidate));
    }
}
