//! Handle metrics for observability
//!
//! Counters for how often producers found the pool exhausted and what
//! became of the records consumers drained.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for handle observability
///
/// # Example
///
/// ```
/// use slot_logger::PoolMetrics;
///
/// let metrics = PoolMetrics::new();
///
/// metrics.record_claimed();
/// metrics.record_claim_failure();
///
/// assert_eq!(metrics.claimed(), 1);
/// assert_eq!(metrics.claim_failures(), 1);
/// assert_eq!(metrics.exhaustion_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct PoolMetrics {
    /// Successful claims
    claimed: AtomicU64,

    /// Claims that found the free list empty (log lines skipped)
    claim_failures: AtomicU64,

    /// Records handed to the transfer queue
    published: AtomicU64,

    /// Records rendered and written to the sink
    emitted: AtomicU64,

    /// Records dropped by the severity threshold
    filtered: AtomicU64,

    /// Records whose code had no template, or whose sink write failed
    emit_failures: AtomicU64,
}

impl PoolMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            claimed: AtomicU64::new(0),
            claim_failures: AtomicU64::new(0),
            published: AtomicU64::new(0),
            emitted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            emit_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn claimed(&self) -> u64 {
        self.claimed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn claim_failures(&self) -> u64 {
        self.claim_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn emit_failures(&self) -> u64 {
        self.emit_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_claimed(&self) -> u64 {
        self.claimed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_claim_failure(&self) -> u64 {
        self.claim_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_published(&self) -> u64 {
        self.published.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emit_failure(&self) -> u64 {
        self.emit_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of claim attempts that found the pool exhausted, as a percentage
    ///
    /// Returns 0.0 if nothing has been claimed yet.
    pub fn exhaustion_rate(&self) -> f64 {
        let failed = self.claim_failures() as f64;
        let total = self.claimed() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.claimed.store(0, Ordering::Relaxed);
        self.claim_failures.store(0, Ordering::Relaxed);
        self.published.store(0, Ordering::Relaxed);
        self.emitted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.emit_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PoolMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            claimed: AtomicU64::new(self.claimed()),
            claim_failures: AtomicU64::new(self.claim_failures()),
            published: AtomicU64::new(self.published()),
            emitted: AtomicU64::new(self.emitted()),
            filtered: AtomicU64::new(self.filtered()),
            emit_failures: AtomicU64::new(self.emit_failures()),
        }
    }
}
