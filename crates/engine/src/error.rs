//! Engine error taxonomy.
//!
//! Three tiers, matching how the scheduler reacts:
//! - recoverable no-ops ([`NoOpReason`]) — logged, counted, run continues;
//! - handler faults ([`StoreError`] surfaced from a handler) — caught at the
//!   scheduler, logged with step context, run continues;
//! - fatal faults ([`SimError`]) — configuration/initialization problems or
//!   store unavailability; the run aborts.

use thiserror::Error;

use supplysim_core::DomainError;
use supplysim_store::StoreError;

/// Startup configuration violation. Always fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("iterations must be positive")]
    ZeroIterations,

    #[error("maintenance period must be positive")]
    ZeroMaintenancePeriod,

    #[error("order expiry age must be positive, got {0} days")]
    NonPositiveExpiry(i64),

    #[error("clock step bound must be at least one minute")]
    ZeroClockStep,

    #[error("orders must allow at least one line")]
    ZeroItemsPerOrder,

    #[error("order lines must allow at least one unit")]
    ZeroQuantityPerLine,

    #[error("invalid event weights: {0}")]
    InvalidEventWeights(String),

    #[error("no-op redraw must allow at least one attempt")]
    ZeroRedrawAttempts,
}

/// Fatal simulation error.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid seeded entity: {0}")]
    InvalidEntity(#[from] DomainError),
}

/// Why a handler completed without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Order creation found no supplier stocking any chosen item's category.
    NoEligibleSupplier,
    /// The unfulfilled-order cache had no candidate.
    EmptyCache,
    /// No inventory row was below its reorder point.
    NothingToRestock,
}

impl NoOpReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoOpReason::NoEligibleSupplier => "no_eligible_supplier",
            NoOpReason::EmptyCache => "empty_cache",
            NoOpReason::NothingToRestock => "nothing_to_restock",
        }
    }
}

/// What a dispatched handler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The handler ran its event (including failed fulfillment attempts,
    /// which still produce a log record).
    Applied,
    /// Nothing to do; recoverable.
    NoOp(NoOpReason),
}
