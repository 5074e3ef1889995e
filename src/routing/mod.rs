//! Subscription routing: patterns, registry, and stream matching
//!
//! Specifications registered at startup are grouped into per-provider
//! buckets; sealing the registry closes the registration phase, after which
//! every lookup is read-only and deterministic.
//!
//! # Architecture
//!
//! ```text
//!   SubscriptionSpec { provider, pattern, selector }
//!        │  register()                 ▲ bucket(provider)
//!        ▼                             │
//!   SubscriptionRegistry ──seal()──► read-only table
//!                                      │
//!                                      ▼
//!   StreamMatcher::resolve(provider, stream_id)
//!        │  pattern match + selector resolve, in bucket order
//!        ▼
//!   Vec<SubscriptionMatch>   (dispatch order == registration order)
//! ```

pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod spec;

pub use matcher::{StreamMatcher, SubscriptionMatch};
pub use pattern::{Pattern, PatternMatch};
pub use registry::SubscriptionRegistry;
pub use spec::SubscriptionSpec;
