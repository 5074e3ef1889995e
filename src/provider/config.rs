//! Provider configuration

use bytes::Bytes;

/// Configuration handed to a provider at init time
///
/// The `payload` is an opaque pass-through blob interpreted by the concrete
/// provider; this crate never inspects it.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Symbolic provider kind, resolved through the provider factory
    pub kind: String,

    /// Opaque provider-specific configuration payload
    pub payload: Bytes,

    /// Capacity of each per-stream broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: "memory".to_string(),
            payload: Bytes::new(),
            broadcast_capacity: 64,
        }
    }
}

impl ProviderConfig {
    /// Create a config for the given provider kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Set the opaque configuration payload
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Set the per-stream broadcast capacity (minimum 1)
    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }
}
