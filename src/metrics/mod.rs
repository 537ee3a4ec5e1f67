//! Performance Metrics Module
//!
//! Lightweight operation counters shared by the deque and the stack. Counters use relaxed
//! atomics, so a snapshot taken while operations are in flight is approximate.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Point-in-time view of a container's operation counters
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerformanceMetrics {
    /// Total number of recorded operations
    pub total_operations: u64,
    /// Number of operations that produced a value or completed
    pub successful_operations: u64,
    /// Number of operations that found nothing to act on
    pub failed_operations: u64,
    /// Number of retries (stack) or lock waits (deque)
    pub contended_operations: u64,
    /// Average successful operation time in nanoseconds
    pub avg_operation_time_ns: u64,
    /// Maximum successful operation time in nanoseconds
    pub max_operation_time_ns: u64,
}

impl PerformanceMetrics {
    /// Calculate success rate as percentage
    pub fn success_rate(&self) -> f64 {
        Self::percentage(self.successful_operations, self.total_operations)
    }

    /// Calculate contention rate as percentage
    pub fn contention_rate(&self) -> f64 {
        Self::percentage(self.contended_operations, self.total_operations)
    }

    /// Calculate failure rate as percentage
    pub fn failure_rate(&self) -> f64 {
        Self::percentage(self.failed_operations, self.total_operations)
    }

    /// Get average operation time as Duration
    pub fn avg_operation_time(&self) -> Duration {
        Duration::from_nanos(self.avg_operation_time_ns)
    }

    /// Get maximum operation time as Duration
    pub fn max_operation_time(&self) -> Duration {
        Duration::from_nanos(self.max_operation_time_ns)
    }

    fn percentage(part: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }
}

/// Internal atomic metrics collection
#[derive(Debug)]
pub(crate) struct AtomicMetrics {
    enabled: AtomicBool,
    total_operations: AtomicU64,
    successful_operations: AtomicU64,
    failed_operations: AtomicU64,
    contended_operations: AtomicU64,
    total_time_ns: AtomicU64,
    max_time_ns: AtomicU64,
}

impl Default for AtomicMetrics {
    fn default() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            total_operations: AtomicU64::new(0),
            successful_operations: AtomicU64::new(0),
            failed_operations: AtomicU64::new(0),
            contended_operations: AtomicU64::new(0),
            total_time_ns: AtomicU64::new(0),
            max_time_ns: AtomicU64::new(0),
        }
    }
}

impl AtomicMetrics {
    #[inline]
    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Start timing an operation. Returns `None` while collection is disabled.
    #[inline]
    pub(crate) fn start(&self) -> Option<Instant> {
        self.is_enabled().then(Instant::now)
    }

    /// Record a successful operation started at `start`
    pub(crate) fn record_success(&self, start: Option<Instant>) {
        if !self.is_enabled() {
            return;
        }
        let duration_ns = start.map_or(0, |start| start.elapsed().as_nanos() as u64);

        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.successful_operations.fetch_add(1, Ordering::Relaxed);
        self.total_time_ns.fetch_add(duration_ns, Ordering::Relaxed);
        self.max_time_ns.fetch_max(duration_ns, Ordering::Relaxed);
    }

    /// Record an operation that found nothing to act on
    pub(crate) fn record_failure(&self) {
        if !self.is_enabled() {
            return;
        }
        self.total_operations.fetch_add(1, Ordering::Relaxed);
        self.failed_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a retry or a wait for a lock
    pub(crate) fn record_contention(&self) {
        if !self.is_enabled() {
            return;
        }
        self.contended_operations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PerformanceMetrics {
        let total_operations = self.total_operations.load(Ordering::Relaxed);
        let successful_operations = self.successful_operations.load(Ordering::Relaxed);
        let total_time = self.total_time_ns.load(Ordering::Relaxed);

        PerformanceMetrics {
            total_operations,
            successful_operations,
            failed_operations: self.failed_operations.load(Ordering::Relaxed),
            contended_operations: self.contended_operations.load(Ordering::Relaxed),
            avg_operation_time_ns: if successful_operations > 0 {
                total_time / successful_operations
            } else {
                0
            },
            max_operation_time_ns: self.max_time_ns.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn reset(&self) {
        self.total_operations.store(0, Ordering::Relaxed);
        self.successful_operations.store(0, Ordering::Relaxed);
        self.failed_operations.store(0, Ordering::Relaxed);
        self.contended_operations.store(0, Ordering::Relaxed);
        self.total_time_ns.store(0, Ordering::Relaxed);
        self.max_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Trait for containers that collect performance metrics
pub trait MetricsCollector {
    /// Get current performance metrics
    fn metrics(&self) -> PerformanceMetrics;

    /// Reset all metrics
    fn reset_metrics(&self);

    /// Enable or disable metrics collection
    fn set_metrics_enabled(&self, enabled: bool);

    /// Check if metrics collection is enabled
    fn is_metrics_enabled(&self) -> bool;
}
