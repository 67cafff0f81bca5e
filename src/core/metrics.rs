//! Pipeline metrics for observability
//!
//! Counters for fan-out, delivery, eviction under overload, handler failures
//! and serialization work. All counters are relaxed atomics shared between the
//! logging call sites and every bucket worker of one manager.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for pipeline observability
///
/// # Example
///
/// ```
/// use rust_log_dispatch::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_queued();
/// metrics.record_evicted();
///
/// assert_eq!(metrics.queued_count(), 1);
/// assert_eq!(metrics.evicted_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries accepted by `log` while enabled
    total_logged: AtomicU64,

    /// Payloads deposited into bucket queues
    queued_count: AtomicU64,

    /// Payloads handed to a handler without failure
    delivered_count: AtomicU64,

    /// Payloads evicted from a full queue
    evicted_count: AtomicU64,

    /// `process` calls that returned an error or panicked
    handler_failures: AtomicU64,

    /// Handlers disabled after too many consecutive failures
    handlers_disabled: AtomicU64,

    /// Text serializations performed
    text_renders: AtomicU64,

    /// JSON serializations performed
    json_renders: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            queued_count: AtomicU64::new(0),
            delivered_count: AtomicU64::new(0),
            evicted_count: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
            handlers_disabled: AtomicU64::new(0),
            text_renders: AtomicU64::new(0),
            json_renders: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queued_count(&self) -> u64 {
        self.queued_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn evicted_count(&self) -> u64 {
        self.evicted_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handlers_disabled(&self) -> u64 {
        self.handlers_disabled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn text_renders(&self) -> u64 {
        self.text_renders.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn json_renders(&self) -> u64 {
        self.json_renders.load(Ordering::Relaxed)
    }

    /// Record an accepted entry; returns the previous value
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queued(&self) -> u64 {
        self.queued_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_evicted(&self) -> u64 {
        self.evicted_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_failure(&self) -> u64 {
        self.handler_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_disabled(&self) -> u64 {
        self.handlers_disabled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_text_render(&self) -> u64 {
        self.text_renders.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_json_render(&self) -> u64 {
        self.json_renders.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of queued payloads lost to eviction, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been queued.
    pub fn eviction_rate(&self) -> f64 {
        let queued = self.queued_count() as f64;
        if queued == 0.0 {
            0.0
        } else {
            (self.evicted_count() as f64 / queued) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        for counter in self.counters() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn counters(&self) -> [&AtomicU64; 8] {
        [
            &self.total_logged,
            &self.queued_count,
            &self.delivered_count,
            &self.evicted_count,
            &self.handler_failures,
            &self.handlers_disabled,
            &self.text_renders,
            &self.json_renders,
        ]
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning takes a point-in-time snapshot; the copy does not track the original.
impl Clone for LoggerMetrics {
    fn clone(&self) -> Self {
        let snapshot = Self::new();
        for (dst, src) in snapshot.counters().iter().zip(self.counters()) {
            dst.store(src.load(Ordering::Relaxed), Ordering::Relaxed);
        }
        snapshot
    }
}
