//! Simulation scheduler and run loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplysim_store::{SimulationStore, StoreError};

use crate::cache::UnfulfilledOrderCache;
use crate::clock::SimClock;
use crate::config::{NoOpAccounting, SimulationConfig};
use crate::error::{HandlerOutcome, SimError};
use crate::handlers;
use crate::log_buffer::FulfillmentLogBuffer;
use crate::maintenance;
use crate::pool::EntityPool;
use crate::rng::RandomSource;

/// The per-step event kinds, in categorical draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderCreation,
    FulfillmentAttempt,
    Restocking,
    Idle,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OrderCreation => "order_creation",
            EventKind::FulfillmentAttempt => "fulfillment_attempt",
            EventKind::Restocking => "restocking",
            EventKind::Idle => "idle",
        }
    }
}

/// Aggregate counters for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u64,
    pub orders_created: u64,
    pub fulfillment_attempts: u64,
    pub restock_runs: u64,
    pub idle_steps: u64,
    pub recoverable_no_ops: u64,
    pub handler_faults: u64,
}

/// The simulation: one logical actor owning the store handle, the seeded
/// random source, the simulated clock, and the in-memory components.
///
/// `step()` executes exactly one iteration; `run()` executes the configured
/// total and finishes with a final maintenance pass, so a completed run
/// always leaves a fully flushed log buffer, a final inventory snapshot, and
/// a final commit.
pub struct Simulation<S, R> {
    store: S,
    rng: R,
    clock: SimClock,
    config: SimulationConfig,
    pool: EntityPool,
    cache: UnfulfilledOrderCache,
    buffer: FulfillmentLogBuffer,
    summary: RunSummary,
}

impl<S, R> Simulation<S, R>
where
    S: SimulationStore,
    R: RandomSource,
{
    /// Validate the configuration, load the entity pools, and prime the
    /// cache. All failures here are fatal: nothing has run yet.
    pub fn new(store: S, rng: R, config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let pool = EntityPool::load(&store)?;
        let mut cache = UnfulfilledOrderCache::new();
        cache.refresh(&store)?;
        let clock = SimClock::new(config.start_date, config.clock_max_step_minutes);

        Ok(Self {
            store,
            rng,
            clock,
            config,
            pool,
            cache,
            buffer: FulfillmentLogBuffer::new(),
            summary: RunSummary::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Execute one iteration: advance the clock, draw and dispatch one event,
    /// then run maintenance on every K-th step.
    ///
    /// Handler faults are caught, logged with their step context, and
    /// counted; the step still completes. Store unavailability and
    /// maintenance failures are fatal.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.summary.steps += 1;
        let now = self.clock.advance(&mut self.rng);

        let mut redraws_left = match self.config.no_op_accounting {
            NoOpAccounting::CountAsStep => 0,
            NoOpAccounting::Redraw { max_attempts } => max_attempts,
        };

        loop {
            let kind = self.draw_event();
            match self.dispatch(kind, now) {
                Ok(HandlerOutcome::Applied) => {
                    self.count_event(kind);
                    break;
                }
                Ok(HandlerOutcome::NoOp(reason)) => {
                    self.summary.recoverable_no_ops += 1;
                    tracing::debug!(
                        step = self.summary.steps,
                        event = kind.as_str(),
                        reason = reason.as_str(),
                        "recoverable no-op"
                    );
                    if redraws_left == 0 {
                        break;
                    }
                    redraws_left -= 1;
                }
                Err(StoreError::Unavailable(message)) => {
                    return Err(SimError::Store(StoreError::Unavailable(message)));
                }
                Err(error) => {
                    self.summary.handler_faults += 1;
                    tracing::warn!(
                        step = self.summary.steps,
                        event = kind.as_str(),
                        error = %error,
                        "handler fault; continuing with next step"
                    );
                    break;
                }
            }
        }

        if self.summary.steps % self.config.maintenance_period == 0 {
            self.run_maintenance(now)?;
        }

        Ok(())
    }

    /// Run the configured number of iterations, then a final maintenance
    /// pass.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        tracing::info!(
            iterations = self.config.iterations,
            seed = self.config.seed,
            start_date = %self.clock.now(),
            "starting simulation"
        );

        for _ in 0..self.config.iterations {
            self.step()?;
        }

        let now = self.clock.now();
        self.run_maintenance(now)?;

        tracing::info!(
            steps = self.summary.steps,
            orders_created = self.summary.orders_created,
            fulfillment_attempts = self.summary.fulfillment_attempts,
            handler_faults = self.summary.handler_faults,
            final_date = %now,
            "simulation complete"
        );
        Ok(self.summary)
    }

    fn run_maintenance(&mut self, now: DateTime<Utc>) -> Result<(), SimError> {
        let report = maintenance::run(
            &mut self.store,
            &self.pool,
            &mut self.cache,
            &mut self.buffer,
            now,
            self.config.order_expiry_days,
        )?;
        tracing::debug!(
            step = self.summary.steps,
            expired = report.expired_orders,
            flushed = report.flushed_records,
            snapshots = report.snapshot_rows,
            "maintenance pass committed"
        );
        Ok(())
    }

    fn draw_event(&mut self) -> EventKind {
        // Weights are validated non-degenerate at startup, so the draw
        // always succeeds.
        match self.rng.weighted(&self.config.event_weights.as_array()) {
            Some(0) => EventKind::OrderCreation,
            Some(1) => EventKind::FulfillmentAttempt,
            Some(2) => EventKind::Restocking,
            _ => EventKind::Idle,
        }
    }

    fn dispatch(
        &mut self,
        kind: EventKind,
        now: DateTime<Utc>,
    ) -> Result<HandlerOutcome, StoreError> {
        match kind {
            EventKind::OrderCreation => handlers::order_creation::handle(
                &mut self.store,
                &self.pool,
                &self.config,
                &mut self.rng,
                now,
            ),
            EventKind::FulfillmentAttempt => handlers::fulfillment::handle(
                &mut self.store,
                &self.pool,
                &mut self.cache,
                &mut self.buffer,
                &mut self.rng,
                now,
            ),
            EventKind::Restocking => {
                handlers::restocking::handle(&mut self.store, &self.config, &mut self.rng, now)
            }
            EventKind::Idle => Ok(HandlerOutcome::Applied),
        }
    }

    fn count_event(&mut self, kind: EventKind) {
        match kind {
            EventKind::OrderCreation => self.summary.orders_created += 1,
            EventKind::FulfillmentAttempt => self.summary.fulfillment_attempts += 1,
            EventKind::Restocking => self.summary.restock_runs += 1,
            EventKind::Idle => self.summary.idle_steps += 1,
        }
    }
}
