//! Target identities and the delivery seam
//!
//! A matched stream resolves to one or more [`TargetId`]s through a
//! [`TargetSelector`]. Delivery to a resolved target goes through the
//! [`TargetRuntime`] trait, the boundary to the hosting actor/target runtime.

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::StreamItem;
use crate::routing::pattern::WILDCARD;

/// Concrete, addressable identity of a message target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId {
    /// Target kind (e.g., an actor type name)
    pub kind: String,
    /// Target instance id
    pub id: String,
}

impl TargetId {
    /// Create a new target identity
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Declarative descriptor of a message destination
///
/// The id template may contain a `#` placeholder that is substituted with
/// the wildcard capture of the matched stream id. A template that needs a
/// capture declines resolution when none is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    kind: String,
    id_template: String,
}

impl TargetSelector {
    /// Create a new selector from a target kind and an id template
    pub fn new(kind: impl Into<String>, id_template: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id_template: id_template.into(),
        }
    }

    /// Target kind this selector addresses
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Raw id template, possibly containing the `#` placeholder
    pub fn id_template(&self) -> &str {
        &self.id_template
    }

    /// Resolve a concrete target identity from the wildcard capture
    ///
    /// Returns `None` when the template requires a capture and none (or an
    /// empty one) is available; such a selector does not apply to this
    /// particular stream instance.
    pub fn resolve(&self, capture: Option<&str>) -> Option<TargetId> {
        if !self.id_template.contains(WILDCARD) {
            return Some(TargetId::new(&self.kind, &self.id_template));
        }

        let capture = capture.filter(|c| !c.is_empty())?;
        Some(TargetId::new(
            &self.kind,
            self.id_template.replace(WILDCARD, capture),
        ))
    }
}

impl std::fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id_template)
    }
}

/// Delivery capability provided by the hosting actor/target runtime.
///
/// Implementations own target addressing, timeouts, and any retry policy;
/// this crate only awaits the returned completion and reports failures.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Deliveries for one published item run concurrently; implementations
///   must tolerate interleaved calls for different targets.
#[async_trait]
pub trait TargetRuntime: Send + Sync {
    /// Deliver one item to a resolved target.
    async fn deliver(&self, target: &TargetId, item: StreamItem) -> Result<()>;
}
