//! `supplysim-observability` — process-level logging setup.

pub mod tracing;

pub use crate::tracing::init;
