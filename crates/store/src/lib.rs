//! Persistence boundary for the simulation.
//!
//! This crate defines the transactional store abstraction the engine drives,
//! the append-only output record types, and an in-memory implementation for
//! tests/dev, without making any storage assumptions.

pub mod in_memory;
pub mod records;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use records::{AttemptOutcome, FailureReason, FulfillmentRecord, InventorySnapshot};
pub use r#trait::{SimulationStore, StoreError};
