//! Per-event handlers.
//!
//! Each handler is stateless per call: it reads and writes entity state
//! through the store, the cache, and the log buffer, and reports either
//! `Applied` or a recoverable no-op. Handlers validate before mutating, so a
//! returned error implies no partial mutation reached the store.

pub(crate) mod fulfillment;
pub(crate) mod order_creation;
pub(crate) mod restocking;
