//! Stream subscription routing and fan-out
//!
//! `streamcast-rs` routes items published on named streams to declaratively
//! subscribed targets. Subscriptions are registered once at startup into a
//! [`SubscriptionRegistry`], the registry is sealed, and a
//! [`FanOutProvider`] is installed in place of the underlying stream
//! provider. From then on, every stream acquired through the decorator
//! carries its match set: items published on it reach the stream's direct
//! subscribers unchanged and are additionally dispatched, concurrently, to
//! every matched target.
//!
//! # Architecture
//!
//! ```text
//!   SubscriptionSpec ──register──► SubscriptionRegistry ──seal──┐
//!                                                               │
//!   publisher ──publish──► FanOutProvider::get_stream(id)       │
//!                              │         match once, cache ◄────┘
//!                              ▼
//!                         FanOutHandle ──► inner handle ──► subscribers
//!                              │
//!                              └──► TargetRuntime::deliver ──► targets
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use streamcast_rs::{
//!     start_fanout, ProviderConfig, ProviderFactory, StreamHandle, StreamItem,
//!     StreamProvider, SubscriptionRegistry, SubscriptionSpec, TargetId, TargetRuntime,
//!     TargetSelector,
//! };
//!
//! struct PrintRuntime;
//!
//! #[async_trait]
//! impl TargetRuntime for PrintRuntime {
//!     async fn deliver(&self, target: &TargetId, item: StreamItem) -> streamcast_rs::Result<()> {
//!         println!("{} <- {:?}", target, item.payload);
//!         Ok(())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(SubscriptionRegistry::new());
//! registry.register(vec![
//!     SubscriptionSpec::new("sms", "a#", TargetSelector::new("consumer", "#")).unwrap(),
//! ]).unwrap();
//!
//! let provider = start_fanout(
//!     "sms",
//!     &ProviderConfig::default(),
//!     &ProviderFactory::with_defaults(),
//!     registry,
//!     Arc::new(PrintRuntime),
//! )
//! .await
//! .unwrap();
//!
//! let stream = provider.get_stream("a-123").await.unwrap();
//! stream.publish(StreamItem::new("hello")).await.unwrap();
//! # });
//! ```
//!
//! # Observability
//!
//! The library emits `tracing` events and never installs a global
//! subscriber; binaries and tests own one-time `tracing_subscriber`
//! initialization.

pub mod bootstrap;
pub mod error;
pub mod fanout;
pub mod provider;
pub mod routing;
pub mod stats;
pub mod target;

pub use bootstrap::start_fanout;
pub use error::{Error, Result};
pub use fanout::{FanOutHandle, FanOutProvider};
pub use provider::{
    MemoryProvider, ProviderConfig, ProviderFactory, StreamHandle, StreamIdentity, StreamItem,
    StreamProvider,
};
pub use routing::{
    Pattern, StreamMatcher, SubscriptionMatch, SubscriptionRegistry, SubscriptionSpec,
};
pub use stats::{FanOutStats, StatsSnapshot};
pub use target::{TargetId, TargetRuntime, TargetSelector};
