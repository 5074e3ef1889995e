//! Fan-out statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the fan-out decorator
///
/// All counters use relaxed ordering; they are operational telemetry, not
/// synchronization.
#[derive(Debug, Default)]
pub struct FanOutStats {
    streams_decorated: AtomicU64,
    items_published: AtomicU64,
    targets_dispatched: AtomicU64,
    dispatch_failures: AtomicU64,
}

impl FanOutStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_stream(&self) {
        self.streams_decorated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_publish(&self) {
        self.items_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatch(&self) {
        self.targets_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Read a point-in-time view of the counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            streams_decorated: self.streams_decorated.load(Ordering::Relaxed),
            items_published: self.items_published.load(Ordering::Relaxed),
            targets_dispatched: self.targets_dispatched.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the fan-out counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Distinct streams a match set was computed for
    pub streams_decorated: u64,
    /// Items published through handles with a non-empty match set
    pub items_published: u64,
    /// Successful per-target dispatches
    pub targets_dispatched: u64,
    /// Failed per-target dispatches
    pub dispatch_failures: u64,
}
