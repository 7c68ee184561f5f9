//! Configuration for a simulation run.
//!
//! All parameters are supplied at construction and immutable during a run;
//! validation happens once at startup and violations are fatal.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Relative weights of the categorical per-step event draw.
///
/// Weights are relative, not probabilities; they only need to be
/// non-negative, finite, and sum to something positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventWeights {
    pub order_creation: f64,
    pub fulfillment_attempt: f64,
    pub restocking: f64,
    pub idle: f64,
}

impl EventWeights {
    /// Draw order: order creation, fulfillment attempt, restocking, idle.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.order_creation,
            self.fulfillment_attempt,
            self.restocking,
            self.idle,
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::InvalidEventWeights(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(ConfigError::InvalidEventWeights(
                "at least one weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            order_creation: 0.20,
            fulfillment_attempt: 0.65,
            restocking: 0.05,
            idle: 0.10,
        }
    }
}

/// How many restock-eligible rows one restocking event considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockGranularity {
    /// One uniformly chosen eligible row per event.
    #[default]
    SingleRandom,
    /// Every eligible row per event.
    AllEligible,
}

/// Whether a recoverable no-op consumes the step's iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpAccounting {
    /// A no-op is a completed step (default).
    #[default]
    CountAsStep,
    /// Redraw a fresh event, up to `max_attempts` extra draws, before the
    /// step is counted anyway.
    Redraw { max_attempts: u8 },
}

/// Full parameter set for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total steps to execute.
    pub iterations: u64,
    /// Maintenance runs every this many steps.
    pub maintenance_period: u64,
    /// Open orders at least this old (simulated days) expire.
    pub order_expiry_days: i64,
    /// Upper bound on the per-step clock increment, in minutes.
    pub clock_max_step_minutes: u32,
    /// Most distinct items a created order may carry.
    pub max_items_per_order: u32,
    /// Largest quantity a single order line may request.
    pub max_quantity_per_line: u32,
    pub event_weights: EventWeights,
    pub restock_granularity: RestockGranularity,
    pub no_op_accounting: NoOpAccounting,
    /// Simulated instant the clock starts from.
    pub start_date: DateTime<Utc>,
    /// Seed for the injected random source.
    pub seed: u64,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.maintenance_period == 0 {
            return Err(ConfigError::ZeroMaintenancePeriod);
        }
        if self.order_expiry_days <= 0 {
            return Err(ConfigError::NonPositiveExpiry(self.order_expiry_days));
        }
        if self.clock_max_step_minutes == 0 {
            return Err(ConfigError::ZeroClockStep);
        }
        if self.max_items_per_order == 0 {
            return Err(ConfigError::ZeroItemsPerOrder);
        }
        if self.max_quantity_per_line == 0 {
            return Err(ConfigError::ZeroQuantityPerLine);
        }
        if let NoOpAccounting::Redraw { max_attempts: 0 } = self.no_op_accounting {
            return Err(ConfigError::ZeroRedrawAttempts);
        }
        self.event_weights.validate()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_maintenance_period(mut self, period: u64) -> Self {
        self.maintenance_period = period;
        self
    }

    pub fn with_event_weights(mut self, weights: EventWeights) -> Self {
        self.event_weights = weights;
        self
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_restock_granularity(mut self, granularity: RestockGranularity) -> Self {
        self.restock_granularity = granularity;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            maintenance_period: 100,
            order_expiry_days: 14,
            clock_max_step_minutes: 15,
            max_items_per_order: 5,
            max_quantity_per_line: 5,
            event_weights: EventWeights::default(),
            restock_granularity: RestockGranularity::default(),
            no_op_accounting: NoOpAccounting::default(),
            // Fixed start instant: a default config plus a seed must describe
            // a fully reproducible run.
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            seed: 42,
        }
    }
}
