//! Logger metrics for observability
//!
//! Sink and remote failures never reach the caller of a log statement. These
//! counters are where they become visible.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// One instance is shared by a root logger and every logger derived from it.
///
/// # Example
///
/// ```
/// use rust_event_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_sink_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.sink_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that reached the dispatch step
    records_written: AtomicU64,

    /// Failed writes to local sinks
    sink_failures: AtomicU64,

    /// Failed remote deliveries (sync or async)
    remote_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            remote_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn remote_failures(&self) -> u64 {
        self.remote_failures.load(Ordering::Relaxed)
    }

    /// Record a dispatched record, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_remote_failure(&self) -> u64 {
        self.remote_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes (local and remote) per dispatched record, as a percentage
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn failure_rate(&self) -> f64 {
        let written = self.records_written() as f64;
        if written == 0.0 {
            0.0
        } else {
            let failures = (self.sink_failures() + self.remote_failures()) as f64;
            (failures / written) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.remote_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            remote_failures: AtomicU64::new(self.remote_failures()),
        }
    }
}
