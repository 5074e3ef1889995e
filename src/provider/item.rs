//! Stream identity and item types
//!
//! This module defines the key type for naming streams and the items that
//! are published on them.

use bytes::Bytes;

/// Unique identifier for a stream (provider name + stream id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamIdentity {
    /// Provider name (e.g., "sms")
    pub provider: String,
    /// Stream id, often `namespace:key`-shaped (e.g., "a" or "orders:42")
    pub id: String,
}

impl StreamIdentity {
    /// Create a new stream identity
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for StreamIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider, self.id)
    }
}

/// An item published on a stream
///
/// Designed to be cheap to clone: fan-out to many targets shares the same
/// reference-counted payload allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamItem {
    /// Item payload (zero-copy via reference counting)
    pub payload: Bytes,
}

impl StreamItem {
    /// Create a new item from anything convertible to `Bytes`
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
