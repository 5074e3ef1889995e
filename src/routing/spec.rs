//! Subscription specification
//!
//! One declarative rule mapping a stream-id pattern to a target selector,
//! scoped to a provider name. Built once at startup; immutable thereafter.

use crate::error::Result;
use crate::routing::pattern::Pattern;
use crate::target::TargetSelector;

/// A declarative subscription rule
///
/// Equality covers all three fields and drives idempotent handling of
/// duplicate registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSpec {
    provider: String,
    pattern: Pattern,
    selector: TargetSelector,
}

impl SubscriptionSpec {
    /// Create a specification, validating the raw pattern.
    ///
    /// A malformed pattern is a configuration error surfaced here, at
    /// registration time, never during matching.
    pub fn new(
        provider: impl Into<String>,
        pattern: &str,
        selector: TargetSelector,
    ) -> Result<Self> {
        Ok(Self {
            provider: provider.into(),
            pattern: Pattern::parse(pattern)?,
            selector,
        })
    }

    /// Provider name this specification is scoped to
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// The validated stream-id pattern
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The target selector fired on a match
    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }
}

impl std::fmt::Display for SubscriptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} -> {}", self.provider, self.pattern, self.selector)
    }
}
