use std::sync::Mutex;

/// Running counters across poll cycles.
pub struct CycleMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub cycles: usize,
    pub aircraft_seen: usize,
    pub notifications: usize,
    pub aircraft_notified: usize,
    pub send_failures: usize,
    pub fetch_failures: usize,
}

impl CycleMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_cycle(&self, aircraft_seen: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cycles += 1;
            metrics.aircraft_seen += aircraft_seen;
        }
    }

    pub fn record_notification(&self, aircraft: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.notifications += 1;
            metrics.aircraft_notified += aircraft;
        }
    }

    pub fn record_send_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.send_failures += 1;
        }
    }

    pub fn record_fetch_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fetch_failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for CycleMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = CycleMetrics::new();
        metrics.record_cycle(3);
        metrics.record_cycle(2);
        metrics.record_notification(2);
        metrics.record_send_failure();
        metrics.record_fetch_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.aircraft_seen, 5);
        assert_eq!(snapshot.aircraft_notified, 2);
        assert_eq!(snapshot.send_failures, 1);
        assert_eq!(snapshot.fetch_failures, 1);
    }
}
