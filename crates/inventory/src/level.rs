use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplysim_catalog::ItemId;
use supplysim_core::DomainError;
use supplysim_parties::SupplierId;

/// Stock position for one item at one supplier.
///
/// Rows are seeded once at initialization and mutated only by the fulfillment
/// handler (decrement) and the restocking handler (set to ceiling); they are
/// never created or deleted mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub item_id: ItemId,
    pub supplier_id: SupplierId,
    pub quantity_on_hand: u32,
    /// Stock level below which the row becomes restock-eligible.
    pub reorder_point: u32,
    /// Probability in `[0, 1]` that restocking triggers when eligible.
    pub restock_weight: f64,
    /// Ceiling a successful restock refills to.
    pub supplier_max_quantity: u32,
    pub last_updated: DateTime<Utc>,
}

impl InventoryLevel {
    /// Restock-eligible: stock strictly below the reorder point.
    pub fn is_restock_eligible(&self) -> bool {
        self.quantity_on_hand < self.reorder_point
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.restock_weight) {
            return Err(DomainError::validation(format!(
                "restock_weight must be within [0, 1], got {}",
                self.restock_weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_level(quantity_on_hand: u32, reorder_point: u32) -> InventoryLevel {
        InventoryLevel {
            item_id: ItemId::from(1),
            supplier_id: SupplierId::from(1),
            quantity_on_hand,
            reorder_point,
            restock_weight: 0.8,
            supplier_max_quantity: 40,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn below_reorder_point_is_eligible() {
        assert!(test_level(1, 5).is_restock_eligible());
    }

    #[test]
    fn at_reorder_point_is_not_eligible() {
        assert!(!test_level(5, 5).is_restock_eligible());
    }

    #[test]
    fn above_reorder_point_is_not_eligible() {
        assert!(!test_level(9, 5).is_restock_eligible());
    }

    #[test]
    fn restock_weight_outside_unit_interval_is_rejected() {
        let mut level = test_level(1, 5);
        level.restock_weight = 1.5;
        assert!(level.validate().is_err());
    }
}
