//! Lock-free metrics collection and periodic reporting
//!
//! Uses atomics so hot-path tick code never contends on a lock.
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Counters for the tracking engine
#[derive(Debug, Default)]
pub struct Metrics {
    /// Tick loop iterations
    ticks_total: AtomicU64,
    /// Ticks skipped because a required input was missing
    ticks_incomplete: AtomicU64,
    /// Datapoints handed to the sink
    samples_emitted: AtomicU64,
    /// Phase transitions fired
    transitions: AtomicU64,
    /// Pressure readings rejected as non-physical
    invalid_readings: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_tick(&self) {
        self.ticks_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_incomplete_tick(&self) {
        self.ticks_incomplete.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_samples_emitted(&self, n: u64) {
        self.samples_emitted.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_transition(&self) {
        self.transitions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_invalid_reading(&self) {
        self.invalid_readings.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot current counter values
    pub fn report(&self) -> MetricsSummary {
        MetricsSummary {
            ticks_total: self.ticks_total.load(Ordering::Relaxed),
            ticks_incomplete: self.ticks_incomplete.load(Ordering::Relaxed),
            samples_emitted: self.samples_emitted.load(Ordering::Relaxed),
            transitions: self.transitions.load(Ordering::Relaxed),
            invalid_readings: self.invalid_readings.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of the engine counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSummary {
    pub ticks_total: u64,
    pub ticks_incomplete: u64,
    pub samples_emitted: u64,
    pub transitions: u64,
    pub invalid_readings: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            ticks_total = %self.ticks_total,
            ticks_incomplete = %self.ticks_incomplete,
            samples_emitted = %self.samples_emitted,
            transitions = %self.transitions,
            invalid_readings = %self.invalid_readings,
            "metrics_summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.record_tick();
        metrics.record_tick();
        metrics.record_incomplete_tick();
        metrics.record_samples_emitted(2);
        metrics.record_transition();
        metrics.record_invalid_reading();

        let summary = metrics.report();
        assert_eq!(summary.ticks_total, 2);
        assert_eq!(summary.ticks_incomplete, 1);
        assert_eq!(summary.samples_emitted, 2);
        assert_eq!(summary.transitions, 1);
        assert_eq!(summary.invalid_readings, 1);
    }

    #[test]
    fn test_report_does_not_reset() {
        let metrics = Metrics::new();
        metrics.record_tick();
        assert_eq!(metrics.report().ticks_total, 1);
        assert_eq!(metrics.report().ticks_total, 1);
    }
}
