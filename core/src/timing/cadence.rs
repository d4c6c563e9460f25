use std::time::{Duration, Instant};

/// Delay until the next tick of a fixed `period` grid, given how long the
/// current cycle took: `period - (elapsed mod period)`.
///
/// A cycle that overruns skips the missed ticks instead of shifting the grid.
pub fn next_delay(period: Duration, elapsed: Duration) -> Duration {
    let period_ns = period.as_nanos();
    if period_ns == 0 {
        return Duration::ZERO;
    }
    let remainder = elapsed.as_nanos() % period_ns;
    let delay = period_ns - remainder;
    Duration::from_nanos(u64::try_from(delay).unwrap_or(u64::MAX))
}

/// Fixed wall-clock polling cadence.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    period: Duration,
}

impl Cadence {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Delay to wait after a cycle that started at `started`.
    pub fn delay_after(&self, started: Instant) -> Duration {
        next_delay(self.period, started.elapsed())
    }
}
