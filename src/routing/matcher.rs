//! Stream matching
//!
//! Resolves a concrete stream identity to the ordered set of ready-to-use
//! delivery channels declared for it. Matching is read-only with respect to
//! the registry and deterministic: the same `(provider, stream_id)` against
//! an unchanged registry always yields the same ordered match set.

use std::sync::Arc;

use crate::provider::StreamItem;
use crate::routing::registry::SubscriptionRegistry;
use crate::routing::spec::SubscriptionSpec;
use crate::target::{TargetId, TargetRuntime};

/// One resolved, ready-to-use delivery channel for a matched stream
#[derive(Clone)]
pub struct SubscriptionMatch {
    target: TargetId,
    runtime: Arc<dyn TargetRuntime>,
}

impl SubscriptionMatch {
    /// The resolved target identity
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    /// Deliver one item to the matched target
    pub async fn dispatch(&self, item: StreamItem) -> crate::error::Result<()> {
        self.runtime.deliver(&self.target, item).await
    }
}

impl std::fmt::Debug for SubscriptionMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionMatch")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Match a stream id against an ordered specification bucket.
///
/// Specification order is preserved in the result; it is both the fan-out
/// dispatch order and the tie-break order when several specifications match.
/// Selectors that decline resolution are dropped from the result.
pub(crate) fn match_specs(
    specs: &[SubscriptionSpec],
    runtime: &Arc<dyn TargetRuntime>,
    stream_id: &str,
) -> Vec<SubscriptionMatch> {
    specs
        .iter()
        .filter_map(|spec| {
            let matched = spec.pattern().matches(stream_id)?;
            match spec.selector().resolve(matched.capture) {
                Some(target) => Some(SubscriptionMatch {
                    target,
                    runtime: Arc::clone(runtime),
                }),
                None => {
                    tracing::debug!(
                        spec = %spec,
                        stream_id = stream_id,
                        "Selector declined; specification does not apply to this stream"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Routing core resolving stream identities to match sets
///
/// Usable directly for diagnostics and tests; the fan-out decorator holds
/// its own copy of the bucket captured at init time.
#[derive(Clone)]
pub struct StreamMatcher {
    registry: Arc<SubscriptionRegistry>,
    runtime: Arc<dyn TargetRuntime>,
}

impl StreamMatcher {
    /// Create a matcher over a registry and a target runtime
    pub fn new(registry: Arc<SubscriptionRegistry>, runtime: Arc<dyn TargetRuntime>) -> Self {
        Self { registry, runtime }
    }

    /// Resolve the ordered match set for one stream identity.
    ///
    /// Zero specifications for the provider yield an empty set, not an
    /// error.
    pub fn resolve(&self, provider: &str, stream_id: &str) -> Vec<SubscriptionMatch> {
        match_specs(&self.registry.bucket(provider), &self.runtime, stream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::routing::spec::SubscriptionSpec;
    use crate::target::TargetSelector;
    use async_trait::async_trait;

    struct NullRuntime;

    #[async_trait]
    impl TargetRuntime for NullRuntime {
        async fn deliver(&self, _target: &TargetId, _item: StreamItem) -> Result<()> {
            Ok(())
        }
    }

    fn matcher_with(specs: Vec<SubscriptionSpec>) -> StreamMatcher {
        let registry = Arc::new(SubscriptionRegistry::new());
        registry.register(specs).unwrap();
        StreamMatcher::new(registry, Arc::new(NullRuntime))
    }

    fn spec(provider: &str, pattern: &str, selector: TargetSelector) -> SubscriptionSpec {
        SubscriptionSpec::new(provider, pattern, selector).unwrap()
    }

    fn targets(matches: &[SubscriptionMatch]) -> Vec<String> {
        matches.iter().map(|m| m.target().to_string()).collect()
    }

    #[test]
    fn test_resolve_preserves_specification_order() {
        let matcher = matcher_with(vec![
            spec("sms", "x", TargetSelector::new("consumer", "a")),
            spec("sms", "#", TargetSelector::new("consumer", "b")),
            spec("sms", "x#", TargetSelector::new("consumer", "c-#")),
        ]);

        let matches = matcher.resolve("sms", "x");
        assert_eq!(targets(&matches), ["consumer/a", "consumer/b"]);

        let matches = matcher.resolve("sms", "x1");
        assert_eq!(targets(&matches), ["consumer/b", "consumer/c-1"]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let matcher = matcher_with(vec![
            spec("sms", "a#", TargetSelector::new("consumer", "#")),
            spec("sms", "#", TargetSelector::new("audit", "log")),
        ]);

        let first = targets(&matcher.resolve("sms", "a-123"));
        let second = targets(&matcher.resolve("sms", "a-123"));

        assert_eq!(first, ["consumer/-123", "audit/log"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_provider_resolves_empty() {
        let matcher = matcher_with(vec![spec(
            "sms",
            "#",
            TargetSelector::new("consumer", "c1"),
        )]);

        assert!(matcher.resolve("other", "z").is_empty());
    }

    #[test]
    fn test_declining_selector_is_dropped() {
        // Exact pattern yields no capture, so the placeholder selector
        // declines while the literal one still fires.
        let matcher = matcher_with(vec![
            spec("sms", "a", TargetSelector::new("consumer", "#")),
            spec("sms", "a", TargetSelector::new("consumer", "c1")),
        ]);

        let matches = matcher.resolve("sms", "a");
        assert_eq!(targets(&matches), ["consumer/c1"]);
    }

    #[test]
    fn test_multiple_matches_all_included() {
        let matcher = matcher_with(vec![
            spec("sms", "a", TargetSelector::new("consumer", "c1")),
            spec("sms", "a", TargetSelector::new("consumer", "c2")),
        ]);

        assert_eq!(matcher.resolve("sms", "a").len(), 2);
    }
}
