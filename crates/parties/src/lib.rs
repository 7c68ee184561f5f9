//! Parties domain module (customers and suppliers).
//!
//! This crate contains the party entities consumed by the simulation,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod customer;
pub mod supplier;

pub use customer::{Customer, CustomerId};
pub use supplier::{Supplier, SupplierId};
