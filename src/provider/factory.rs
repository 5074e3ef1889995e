//! Provider factory
//!
//! Builds concrete providers from a symbolic kind identifier resolved at
//! configuration-parse time. An unknown kind is a configuration error at
//! build time, never a runtime surprise.

use std::collections::HashMap;
use std::sync::Arc;

use super::config::ProviderConfig;
use super::memory::MemoryProvider;
use super::StreamProvider;
use crate::error::{Error, Result};

type BuilderFn = Box<dyn Fn(&ProviderConfig) -> Result<Arc<dyn StreamProvider>> + Send + Sync>;

/// Registry of provider builders keyed by kind
pub struct ProviderFactory {
    builders: HashMap<String, BuilderFn>,
}

impl ProviderFactory {
    /// Create an empty factory with no kinds registered
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Create a factory with the built-in `"memory"` kind registered
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register_kind("memory", |_config| Ok(Arc::new(MemoryProvider::new())));
        factory
    }

    /// Register a builder for a provider kind, replacing any previous one
    pub fn register_kind<F>(&mut self, kind: impl Into<String>, builder: F)
    where
        F: Fn(&ProviderConfig) -> Result<Arc<dyn StreamProvider>> + Send + Sync + 'static,
    {
        self.builders.insert(kind.into(), Box::new(builder));
    }

    /// Build a provider for the kind named in the configuration
    pub fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn StreamProvider>> {
        let builder = self
            .builders
            .get(&config.kind)
            .ok_or_else(|| Error::UnknownProviderKind(config.kind.clone()))?;
        builder(config)
    }

    /// Registered kind names, for diagnostics
    pub fn kinds(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_kind_builds() {
        let factory = ProviderFactory::with_defaults();
        let config = ProviderConfig::new("memory");

        let provider = factory.build(&config).unwrap();
        provider.init("mem", &config).await.unwrap();
        provider.start().await.unwrap();

        assert!(provider.get_stream("a").await.is_ok());
    }

    #[test]
    fn test_unknown_kind_is_config_error() {
        let factory = ProviderFactory::with_defaults();
        let err = factory.build(&ProviderConfig::new("kafka")).unwrap_err();

        assert!(matches!(err, Error::UnknownProviderKind(kind) if kind == "kafka"));
    }

    #[test]
    fn test_custom_kind_registration() {
        let mut factory = ProviderFactory::new();
        assert!(factory.kinds().is_empty());

        factory.register_kind("custom", |_config| Ok(Arc::new(MemoryProvider::new())));
        assert_eq!(factory.kinds(), ["custom"]);
        assert!(factory.build(&ProviderConfig::new("custom")).is_ok());
    }
}
