//! Simulated clock.

use chrono::{DateTime, Duration, Utc};

use crate::rng::RandomSource;

/// Monotonically advancing logical time, distinct from wall-clock time.
///
/// Each step advances by a uniform random number of minutes in
/// `1..=max_step_minutes`, so simulated dates are strictly increasing and
/// order aging is driven entirely by the seeded generator.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: DateTime<Utc>,
    max_step_minutes: u32,
}

impl SimClock {
    pub fn new(start: DateTime<Utc>, max_step_minutes: u32) -> Self {
        Self {
            now: start,
            max_step_minutes,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Advance by a random increment and return the new simulated instant.
    pub fn advance<R: RandomSource>(&mut self, rng: &mut R) -> DateTime<Utc> {
        let minutes = rng.uniform_u32(1, self.max_step_minutes);
        self.now += Duration::minutes(i64::from(minutes));
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ChaChaSource;
    use chrono::TimeZone;

    #[test]
    fn advance_is_strictly_monotonic_and_bounded() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut clock = SimClock::new(start, 15);
        let mut rng = ChaChaSource::seeded(42);

        let mut previous = clock.now();
        for _ in 0..500 {
            let now = clock.advance(&mut rng);
            let delta = now.signed_duration_since(previous);
            assert!(delta >= Duration::minutes(1));
            assert!(delta <= Duration::minutes(15));
            previous = now;
        }
    }

    #[test]
    fn advance_with_unit_bound_steps_one_minute() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut clock = SimClock::new(start, 1);
        let mut rng = ChaChaSource::seeded(42);

        clock.advance(&mut rng);
        assert_eq!(clock.now(), start + Duration::minutes(1));
    }
}
