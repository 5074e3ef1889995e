//! In-memory stream provider
//!
//! Reference implementation of the provider contract: each stream is a
//! broadcast channel created on first use. Serves as the undecorated
//! collaborator in demos and tests; durability and rewind are explicitly
//! out of scope.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use super::config::ProviderConfig;
use super::item::{StreamIdentity, StreamItem};
use super::{StreamHandle, StreamProvider};
use crate::error::{Error, Result};

/// One in-memory stream backed by a broadcast channel
struct MemoryStream {
    identity: StreamIdentity,
    tx: broadcast::Sender<StreamItem>,
}

#[async_trait]
impl StreamHandle for MemoryStream {
    fn identity(&self) -> &StreamIdentity {
        &self.identity
    }

    async fn publish(&self, item: StreamItem) -> Result<()> {
        // send() errors only when there are no receivers; publishing to a
        // stream nobody listens on is not a failure.
        let _ = self.tx.send(item);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StreamItem> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Initialized,
    Started,
    Closed,
}

struct Inner {
    name: Option<String>,
    lifecycle: Lifecycle,
    broadcast_capacity: usize,
    streams: HashMap<String, Arc<MemoryStream>>,
}

/// In-memory provider holding one broadcast channel per stream id
pub struct MemoryProvider {
    inner: RwLock<Inner>,
}

impl MemoryProvider {
    /// Create a provider; it must be initialized and started before use
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                name: None,
                lifecycle: Lifecycle::Created,
                broadcast_capacity: ProviderConfig::default().broadcast_capacity,
                streams: HashMap::new(),
            }),
        }
    }

    /// Number of live streams
    pub async fn stream_count(&self) -> usize {
        self.inner.read().await.streams.len()
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamProvider for MemoryProvider {
    async fn init(&self, name: &str, config: &ProviderConfig) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.lifecycle != Lifecycle::Created {
            return Err(Error::AlreadyInitialized(name.to_string()));
        }

        inner.name = Some(name.to_string());
        inner.broadcast_capacity = config.broadcast_capacity.max(1);
        inner.lifecycle = Lifecycle::Initialized;

        tracing::debug!(provider = name, "Memory provider initialized");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        match inner.lifecycle {
            Lifecycle::Initialized => {
                inner.lifecycle = Lifecycle::Started;
                Ok(())
            }
            Lifecycle::Created => Err(Error::NotInitialized("memory".to_string())),
            Lifecycle::Started => Ok(()),
            Lifecycle::Closed => Err(Error::ProviderClosed(provider_name(&inner))),
        }
    }

    async fn close(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        let dropped = inner.streams.len();
        inner.streams.clear();
        inner.lifecycle = Lifecycle::Closed;

        tracing::debug!(
            provider = %provider_name(&inner),
            streams = dropped,
            "Memory provider closed"
        );
        Ok(())
    }

    async fn get_stream(&self, id: &str) -> Result<Arc<dyn StreamHandle>> {
        let mut inner = self.inner.write().await;

        match inner.lifecycle {
            Lifecycle::Started => {}
            Lifecycle::Closed => return Err(Error::ProviderClosed(provider_name(&inner))),
            _ => return Err(Error::NotInitialized(provider_name(&inner))),
        }

        let capacity = inner.broadcast_capacity;
        let name = provider_name(&inner);
        let stream = inner
            .streams
            .entry(id.to_string())
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(capacity);
                Arc::new(MemoryStream {
                    identity: StreamIdentity::new(name, id),
                    tx,
                })
            })
            .clone();

        let handle: Arc<dyn StreamHandle> = stream;
        Ok(handle)
    }
}

fn provider_name(inner: &Inner) -> String {
    inner.name.clone().unwrap_or_else(|| "memory".to_string())
}
