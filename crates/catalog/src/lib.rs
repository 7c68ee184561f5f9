//! Catalog domain module (items).
//!
//! This crate contains the item catalog consumed by the simulation,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod item;

pub use item::{Item, ItemId};
