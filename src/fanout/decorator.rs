//! Fan-out provider decorator
//!
//! Implements the provider contract around an inner provider. Stream
//! acquisition computes the stream's match set exactly once, caches the
//! wrapping handle under the stream id, and hands the same wrapper to every
//! caller. Start is a passthrough; close clears the cache and then closes
//! the inner provider.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::handle::FanOutHandle;
use crate::error::{Error, Result};
use crate::provider::{ProviderConfig, StreamHandle, StreamProvider};
use crate::routing::matcher::match_specs;
use crate::routing::{StreamMatcher, SubscriptionMatch, SubscriptionRegistry, SubscriptionSpec};
use crate::stats::{FanOutStats, StatsSnapshot};
use crate::target::TargetRuntime;

/// State fixed at init time: the provider's declared name and its
/// specification bucket, captured eagerly from the sealed registry.
struct InitState {
    name: String,
    specs: Vec<SubscriptionSpec>,
}

/// Transparent decorator adding subscription fan-out to a stream provider
pub struct FanOutProvider {
    inner: Arc<dyn StreamProvider>,
    registry: Arc<SubscriptionRegistry>,
    runtime: Arc<dyn TargetRuntime>,
    state: OnceLock<InitState>,
    streams: Mutex<HashMap<String, Arc<FanOutHandle>>>,
    stats: Arc<FanOutStats>,
}

impl std::fmt::Debug for FanOutProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOutProvider").finish_non_exhaustive()
    }
}

impl FanOutProvider {
    /// Decorate an inner provider with a registry and a target runtime
    pub fn new(
        inner: Arc<dyn StreamProvider>,
        registry: Arc<SubscriptionRegistry>,
        runtime: Arc<dyn TargetRuntime>,
    ) -> Self {
        Self {
            inner,
            registry,
            runtime,
            state: OnceLock::new(),
            streams: Mutex::new(HashMap::new()),
            stats: Arc::new(FanOutStats::new()),
        }
    }

    /// Snapshot of the fan-out counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Diagnostics matcher over the same registry and runtime
    pub fn matcher(&self) -> StreamMatcher {
        StreamMatcher::new(Arc::clone(&self.registry), Arc::clone(&self.runtime))
    }

    /// Resolve the match set for a stream id against the bucket captured at
    /// init time. Diagnostics/testing surface; the serving path caches the
    /// same computation per stream.
    pub fn resolve_matches(&self, stream_id: &str) -> Result<Vec<SubscriptionMatch>> {
        let state = self.init_state()?;
        Ok(match_specs(&state.specs, &self.runtime, stream_id))
    }

    fn init_state(&self) -> Result<&InitState> {
        self.state
            .get()
            .ok_or_else(|| Error::NotInitialized("fan-out decorator".to_string()))
    }
}

#[async_trait]
impl StreamProvider for FanOutProvider {
    /// Capture the declared name and specification bucket, then initialize
    /// the inner provider with the same configuration. Inner failures
    /// propagate unchanged. Fails when the registry has not been sealed:
    /// the seal is the barrier between registration and serving.
    async fn init(&self, name: &str, config: &ProviderConfig) -> Result<()> {
        if !self.registry.is_sealed() {
            return Err(Error::RegistryOpen);
        }

        let specs = self.registry.bucket(name);
        let spec_count = specs.len();
        let state = InitState {
            name: name.to_string(),
            specs,
        };
        if self.state.set(state).is_err() {
            return Err(Error::AlreadyInitialized(name.to_string()));
        }

        tracing::info!(
            provider = name,
            specs = spec_count,
            "Fan-out decorator initialized"
        );

        self.inner.init(name, config).await
    }

    async fn start(&self) -> Result<()> {
        self.inner.start().await
    }

    async fn close(&self) -> Result<()> {
        let dropped = {
            let mut streams = self.streams.lock().await;
            let dropped = streams.len();
            streams.clear();
            dropped
        };

        if let Ok(state) = self.init_state() {
            tracing::debug!(
                provider = %state.name,
                streams = dropped,
                "Fan-out match cache cleared"
            );
        }

        self.inner.close().await
    }

    /// Delegate to the inner provider, then wrap the handle with the
    /// stream's cached match set. Concurrent first-time calls for one id
    /// compute the match set once and observe the same wrapper instance.
    async fn get_stream(&self, id: &str) -> Result<Arc<dyn StreamHandle>> {
        let state = self.init_state()?;

        if let Some(existing) = self.streams.lock().await.get(id) {
            let handle: Arc<dyn StreamHandle> = existing.clone();
            return Ok(handle);
        }

        let inner_handle = self.inner.get_stream(id).await?;

        let mut streams = self.streams.lock().await;
        let wrapper = match streams.get(id) {
            // Lost the insert race: drop our inner handle, reuse the winner.
            Some(existing) => Arc::clone(existing),
            None => {
                let matches = match_specs(&state.specs, &self.runtime, id);
                self.stats.record_stream();
                tracing::debug!(
                    provider = %state.name,
                    stream = id,
                    matches = matches.len(),
                    "Stream match set computed"
                );

                let wrapper = Arc::new(FanOutHandle::new(
                    inner_handle,
                    matches,
                    Arc::clone(&self.stats),
                ));
                streams.insert(id.to_string(), Arc::clone(&wrapper));
                wrapper
            }
        };

        let handle: Arc<dyn StreamHandle> = wrapper;
        Ok(handle)
    }
}
