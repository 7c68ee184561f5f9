use serde::{Deserialize, Serialize};

use supplysim_core::{DomainError, EntityId};

/// Supplier identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(pub EntityId);

impl SupplierId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SupplierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for SupplierId {
    fn from(value: u64) -> Self {
        Self(EntityId::new(value))
    }
}

/// A supplier stocking one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    /// Product category this supplier serves; order lines can only target a
    /// supplier whose category matches the item's.
    pub category: String,
    /// Probability in `[0, 1]` that a fulfillment attempt from this supplier
    /// fails even with stock available.
    pub failure_rate: f64,
    /// Relative weight used when choosing which eligible supplier an order
    /// line is associated with (the future attempt target).
    pub fulfillment_weight: f64,
}

impl Supplier {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("supplier category cannot be empty"));
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(DomainError::validation(format!(
                "failure_rate must be within [0, 1], got {}",
                self.failure_rate
            )));
        }
        if self.fulfillment_weight <= 0.0 || !self.fulfillment_weight.is_finite() {
            return Err(DomainError::validation(format!(
                "fulfillment_weight must be positive and finite, got {}",
                self.fulfillment_weight
            )));
        }
        Ok(())
    }

    /// Whether this supplier can source the given item category.
    pub fn stocks_category(&self, category: &str) -> bool {
        self.category == category
    }
}
