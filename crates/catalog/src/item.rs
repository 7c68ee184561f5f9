use serde::{Deserialize, Serialize};

use supplysim_core::{DomainError, EntityId};

/// Catalog item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub EntityId);

impl ItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(EntityId::new(value))
    }
}

/// An item customers can order.
///
/// Items are seeded once by an external generator and never mutated during a
/// run; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Product category; suppliers stock exactly one category, and an item
    /// can only be sourced from suppliers matching its category.
    pub category: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl Item {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("item category cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item() -> Item {
        Item {
            id: ItemId::from(1),
            name: "Widget".to_string(),
            category: "Hardware".to_string(),
            unit_price: 1250,
        }
    }

    #[test]
    fn valid_item_passes_validation() {
        assert!(test_item().validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut item = test_item();
        item.name = "  ".to_string();
        let err = item.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("name") => {}
            _ => panic!("Expected validation error for empty name"),
        }
    }

    #[test]
    fn empty_category_is_rejected() {
        let mut item = test_item();
        item.category = String::new();
        assert!(item.validate().is_err());
    }
}
