//! Read-only entity projections loaded from the store at startup.

use std::collections::BTreeMap;

use supplysim_catalog::Item;
use supplysim_core::DomainError;
use supplysim_parties::{Customer, Supplier, SupplierId};
use supplysim_store::SimulationStore;

use crate::error::SimError;
use crate::rng::RandomSource;

/// Transient, derivable projection of the seeded entity pools.
///
/// Loaded once at initialization; the store owns the entities and nothing in
/// this pool mutates during a run. The category index answers "which
/// suppliers can source this item" without rescanning the supplier table.
#[derive(Debug, Clone)]
pub struct EntityPool {
    customers: Vec<Customer>,
    items: Vec<Item>,
    suppliers: BTreeMap<SupplierId, Supplier>,
    /// Category -> (supplier, fulfillment weight), in supplier id order.
    by_category: BTreeMap<String, Vec<(SupplierId, f64)>>,
}

impl EntityPool {
    /// Load and validate the seeded pools.
    ///
    /// Fails fast on empty customer/item pools or any entity carrying an
    /// out-of-range probability; these are startup faults, not per-step ones.
    pub fn load<S: SimulationStore>(store: &S) -> Result<Self, SimError> {
        let customers = store.customers()?;
        let items = store.items()?;
        let suppliers = store.suppliers()?;

        if customers.is_empty() {
            return Err(SimError::InvalidEntity(DomainError::validation(
                "at least one customer must be seeded",
            )));
        }
        if items.is_empty() {
            return Err(SimError::InvalidEntity(DomainError::validation(
                "at least one item must be seeded",
            )));
        }

        for customer in &customers {
            customer.validate()?;
        }
        for item in &items {
            item.validate()?;
        }

        let mut by_category: BTreeMap<String, Vec<(SupplierId, f64)>> = BTreeMap::new();
        let mut supplier_map = BTreeMap::new();
        for supplier in suppliers {
            supplier.validate()?;
            by_category
                .entry(supplier.category.clone())
                .or_default()
                .push((supplier.id, supplier.fulfillment_weight));
            supplier_map.insert(supplier.id, supplier);
        }

        for level in store.inventory_levels()? {
            level.validate()?;
        }

        Ok(Self {
            customers,
            items,
            suppliers: supplier_map,
            by_category,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn random_customer<R: RandomSource>(&self, rng: &mut R) -> &Customer {
        &self.customers[rng.index(self.customers.len())]
    }

    pub fn supplier(&self, id: SupplierId) -> Option<&Supplier> {
        self.suppliers.get(&id)
    }

    /// Suppliers stocking the given category, with their fulfillment weights.
    pub fn eligible_suppliers(&self, category: &str) -> &[(SupplierId, f64)] {
        self.by_category
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
