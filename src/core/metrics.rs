//! Dispatcher metrics for observability
//!
//! Counters describing what a dispatcher did with the calls it received:
//! how many passed the severity filter, how many sink writes failed, and
//! how many platform handles were created.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher
///
/// # Example
///
/// ```
/// use tagged_logger::DispatcherMetrics;
///
/// let metrics = DispatcherMetrics::new();
/// metrics.record_accepted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct DispatcherMetrics {
    /// Calls that passed the severity filter
    accepted: AtomicU64,

    /// Calls rejected by the severity filter
    filtered: AtomicU64,

    /// Records written to every sink without failure
    delivered: AtomicU64,

    /// Individual sink writes that returned an error or panicked
    sink_failures: AtomicU64,

    /// Platform handles constructed (cache misses)
    handles_created: AtomicU64,

    /// Accepted records that could not be queued because the worker had stopped
    dropped: AtomicU64,
}

impl DispatcherMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            handles_created: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handles_created(&self) -> u64 {
        self.handles_created.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handle_created(&self) -> u64 {
        self.handles_created.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of accepted calls among all calls, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged.
    pub fn acceptance_rate(&self) -> f64 {
        let accepted = self.accepted() as f64;
        let total = accepted + self.filtered() as f64;
        if total == 0.0 {
            0.0
        } else {
            (accepted / total) * 100.0
        }
    }
}

impl Default for DispatcherMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatcherMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            filtered: AtomicU64::new(self.filtered()),
            delivered: AtomicU64::new(self.delivered()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            handles_created: AtomicU64::new(self.handles_created()),
            dropped: AtomicU64::new(self.dropped()),
        }
    }
}
