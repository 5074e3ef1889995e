//! Stream provider abstraction
//!
//! The undecorated contract every provider implements, the configuration it
//! is initialized with, an in-memory reference implementation, and the
//! factory that builds providers from symbolic kind identifiers.
//!
//! The fan-out decorator implements [`StreamProvider`] itself, so callers
//! cannot distinguish a decorated provider from a bare one.

pub mod config;
pub mod factory;
pub mod item;
pub mod memory;

pub use config::ProviderConfig;
pub use factory::ProviderFactory;
pub use item::{StreamIdentity, StreamItem};
pub use memory::MemoryProvider;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;

/// Contract of a stream provider.
///
/// Lifecycle: `init` exactly once, then `start`, then any number of
/// `get_stream` calls, then `close`. Implementations surface misuse through
/// the crate error type rather than panicking.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Initialize the provider under its declared name.
    ///
    /// The name doubles as the subscription-registry bucket key. The
    /// configuration payload is opaque to callers and interpreted by the
    /// concrete provider only.
    async fn init(&self, name: &str, config: &ProviderConfig) -> Result<()>;

    /// Start serving streams
    async fn start(&self) -> Result<()>;

    /// Stop serving and release per-stream resources
    async fn close(&self) -> Result<()>;

    /// Obtain the handle for one logical stream, creating it on first use
    async fn get_stream(&self, id: &str) -> Result<Arc<dyn StreamHandle>>;
}

impl std::fmt::Debug for dyn StreamProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StreamProvider")
    }
}

/// Handle to one logical, independently-publishable stream
#[async_trait]
pub trait StreamHandle: Send + Sync {
    /// The identity of the stream this handle publishes to
    fn identity(&self) -> &StreamIdentity;

    /// Publish one item to the stream
    async fn publish(&self, item: StreamItem) -> Result<()>;

    /// Subscribe to items published on this stream
    fn subscribe(&self) -> broadcast::Receiver<StreamItem>;
}
