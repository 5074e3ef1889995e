//! Startup wiring
//!
//! Thin glue that builds the inner provider from the factory, seals the
//! registry, and installs the fan-out decorator in the provider's place.

use std::sync::Arc;

use crate::error::Result;
use crate::fanout::FanOutProvider;
use crate::provider::{ProviderConfig, ProviderFactory, StreamProvider};
use crate::routing::SubscriptionRegistry;
use crate::target::TargetRuntime;

/// Build, initialize, and start a fan-out-decorated provider.
///
/// Seals the registry (idempotently) before serving begins: this call is
/// the barrier between the registration phase and the serving phase.
pub async fn start_fanout(
    name: &str,
    config: &ProviderConfig,
    factory: &ProviderFactory,
    registry: Arc<SubscriptionRegistry>,
    runtime: Arc<dyn TargetRuntime>,
) -> Result<Arc<FanOutProvider>> {
    registry.seal();

    let inner = factory.build(config)?;
    let provider = Arc::new(FanOutProvider::new(inner, Arc::clone(&registry), runtime));
    provider.init(name, config).await?;
    provider.start().await?;

    tracing::info!(
        provider = name,
        kind = %config.kind,
        providers = registry.provider_count(),
        specs = registry.spec_count(),
        "Fan-out provider started"
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::provider::StreamItem;
    use crate::routing::SubscriptionSpec;
    use crate::target::{TargetId, TargetSelector};
    use async_trait::async_trait;

    struct NullRuntime;

    #[async_trait]
    impl crate::target::TargetRuntime for NullRuntime {
        async fn deliver(&self, _target: &TargetId, _item: StreamItem) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_start_fanout_wires_and_seals() {
        let registry = Arc::new(SubscriptionRegistry::new());
        registry
            .register(vec![SubscriptionSpec::new(
                "sms",
                "#",
                TargetSelector::new("consumer", "c1"),
            )
            .unwrap()])
            .unwrap();

        let provider = start_fanout(
            "sms",
            &ProviderConfig::default(),
            &ProviderFactory::with_defaults(),
            Arc::clone(&registry),
            Arc::new(NullRuntime),
        )
        .await
        .unwrap();

        assert!(registry.is_sealed());
        assert!(provider.get_stream("a").await.is_ok());

        // Registration is closed once serving has begun.
        let err = registry
            .register(vec![SubscriptionSpec::new(
                "sms",
                "b",
                TargetSelector::new("consumer", "c2"),
            )
            .unwrap()])
            .unwrap_err();
        assert!(matches!(err, Error::RegistrySealed));
    }

    #[tokio::test]
    async fn test_unknown_kind_fails_before_init() {
        let registry = Arc::new(SubscriptionRegistry::new());

        let err = start_fanout(
            "sms",
            &ProviderConfig::new("kafka"),
            &ProviderFactory::with_defaults(),
            registry,
            Arc::new(NullRuntime),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::UnknownProviderKind(_)));
    }
}
