//! Subscription registry
//!
//! The process-wide routing table, built during startup and sealed before
//! any stream is served. Specifications are grouped into per-provider
//! buckets; bucket order is registration order and fixes dispatch order.
//!
//! The registry is an explicitly constructed object handed to the
//! components that need it. `seal()` is the single barrier between the
//! registration phase and the serving phase: `register` fails once sealed,
//! and the fan-out decorator refuses to initialize until sealed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::routing::spec::SubscriptionSpec;

/// Routing table mapping provider names to ordered subscription buckets
pub struct SubscriptionRegistry {
    buckets: RwLock<HashMap<String, Vec<SubscriptionSpec>>>,
    sealed: AtomicBool,
}

impl SubscriptionRegistry {
    /// Create an empty, open registry
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            sealed: AtomicBool::new(false),
        }
    }

    /// Append specifications into their per-provider buckets.
    ///
    /// Safe to call multiple times before [`seal`](Self::seal), e.g. for
    /// incremental registration from several declaring modules. Identical
    /// duplicate specifications are skipped so re-registration cannot cause
    /// double dispatch; distinct specifications matching the same stream all
    /// fire.
    pub fn register(&self, specs: impl IntoIterator<Item = SubscriptionSpec>) -> Result<()> {
        if self.is_sealed() {
            return Err(Error::RegistrySealed);
        }

        let mut buckets = self.buckets.write().expect("registry lock poisoned");
        for spec in specs {
            let bucket = buckets.entry(spec.provider().to_string()).or_default();

            if bucket.contains(&spec) {
                tracing::debug!(spec = %spec, "Duplicate subscription skipped");
                continue;
            }

            tracing::debug!(spec = %spec, "Subscription registered");
            bucket.push(spec);
        }

        Ok(())
    }

    /// Close the registration phase.
    ///
    /// Idempotent. After sealing, the table is read-only and concurrent
    /// lookups are safe without coordination.
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::AcqRel) {
            tracing::info!(
                providers = self.provider_count(),
                specs = self.spec_count(),
                "Subscription registry sealed"
            );
        }
    }

    /// Whether the registration phase has been closed
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// The ordered specification bucket for a provider.
    ///
    /// Returns an empty vec (never an error) for an unknown provider name.
    pub fn bucket(&self, provider: &str) -> Vec<SubscriptionSpec> {
        self.buckets
            .read()
            .expect("registry lock poisoned")
            .get(provider)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of providers with at least one specification
    pub fn provider_count(&self) -> usize {
        self.buckets.read().expect("registry lock poisoned").len()
    }

    /// Total number of registered specifications
    pub fn spec_count(&self) -> usize {
        self.buckets
            .read()
            .expect("registry lock poisoned")
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
