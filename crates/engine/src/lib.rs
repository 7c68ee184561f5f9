//! `supplysim-engine` — the discrete-event simulation core.
//!
//! One logical actor advances a simulated clock, draws one weighted event per
//! step (order creation, fulfillment attempt, restocking, idle), dispatches
//! the matching handler against a transactional store, and every K steps runs
//! a maintenance pass (expire stale orders, refresh the unfulfilled-order
//! cache, flush the attempt log buffer, snapshot inventory, commit).
//!
//! All randomness flows through one seeded source, so a fixed seed replays
//! the run bit-for-bit.
//!
//! ```ignore
//! use supplysim_engine::{ChaChaSource, Simulation, SimulationConfig};
//! use supplysim_store::InMemoryStore;
//!
//! let store = /* seeded by an external generator */ InMemoryStore::new();
//! let config = SimulationConfig::default().with_seed(42).with_iterations(100_000);
//! let rng = ChaChaSource::seeded(config.seed);
//!
//! let mut simulation = Simulation::new(store, rng, config)?;
//! let summary = simulation.run()?;
//! println!("created {} orders", summary.orders_created);
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
mod handlers;
pub mod log_buffer;
pub mod maintenance;
pub mod pool;
pub mod rng;
pub mod simulation;

mod integration_tests;

pub use cache::{Candidate, UnfulfilledOrderCache};
pub use clock::SimClock;
pub use config::{EventWeights, NoOpAccounting, RestockGranularity, SimulationConfig};
pub use error::{ConfigError, HandlerOutcome, NoOpReason, SimError};
pub use log_buffer::FulfillmentLogBuffer;
pub use maintenance::MaintenanceReport;
pub use pool::EntityPool;
pub use rng::{ChaChaSource, RandomSource};
pub use simulation::{EventKind, RunSummary, Simulation};
