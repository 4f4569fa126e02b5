//! Logger metrics for observability
//!
//! Per-logger counters for accepted, filtered and failed deliveries.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by each [`Logger`](crate::Logger)
///
/// # Example
///
/// ```
/// use micro_logging::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.records_emitted(), 1);
/// assert_eq!(metrics.records_filtered(), 1);
/// assert_eq!(metrics.handler_failures(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that passed the logger threshold and were dispatched
    records_emitted: AtomicU64,

    /// Calls rejected by the logger threshold before a record was built
    records_filtered: AtomicU64,

    /// Handler invocations that returned an error or panicked
    handler_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_emitted: AtomicU64::new(0),
            records_filtered: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_filtered(&self) -> u64 {
        self.records_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.records_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.records_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_failure(&self) -> u64 {
        self.handler_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of dispatched records whose delivery failed on some handler, in percent
    pub fn failure_rate(&self) -> f64 {
        let emitted = self.records_emitted();
        if emitted == 0 {
            return 0.0;
        }
        (self.handler_failures() as f64 / emitted as f64) * 100.0
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_emitted.store(0, Ordering::Relaxed);
        self.records_filtered.store(0, Ordering::Relaxed);
        self.handler_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.records_emitted(), 0);
        assert_eq!(metrics.records_filtered(), 0);
        assert_eq!(metrics.handler_failures(), 0);
        assert_eq!(metrics.failure_rate(), 0.0);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        for _ in 0..4 {
            metrics.record_emitted();
        }
        metrics.record_handler_failure();

        let rate = metrics.failure_rate();
        assert!((24.9..=25.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_emitted();
        metrics.record_filtered();
        metrics.record_handler_failure();
        metrics.reset();

        assert_eq!(metrics.records_emitted(), 0);
        assert_eq!(metrics.records_filtered(), 0);
        assert_eq!(metrics.handler_failures(), 0);
    }
}
