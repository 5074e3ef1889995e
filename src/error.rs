//! Crate error types
//!
//! One error type covers registration-time configuration problems,
//! provider lifecycle misuse, and fan-out dispatch failures.

use crate::provider::StreamIdentity;
use crate::target::TargetId;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for routing and fan-out operations
#[derive(Debug)]
pub enum Error {
    /// Subscription pattern failed validation at registration time
    InvalidPattern {
        /// The raw pattern as supplied
        pattern: String,
        /// What made it invalid
        reason: &'static str,
    },
    /// Registration attempted after the registry was sealed
    RegistrySealed,
    /// The decorator was initialized against a registry that is still open
    /// for registration
    RegistryOpen,
    /// Provider was initialized twice
    AlreadyInitialized(String),
    /// Operation requires a provider that has been initialized and started
    NotInitialized(String),
    /// No builder registered for the requested provider kind
    UnknownProviderKind(String),
    /// Operation on a provider that has been closed
    ProviderClosed(String),
    /// One or more matched targets failed to take delivery of a published
    /// item; the underlying publish and all other deliveries completed
    Dispatch {
        /// Stream the item was published on
        stream: StreamIdentity,
        /// Failed targets with the per-target failure text
        failures: Vec<(TargetId, String)>,
    },
    /// Transport-level failure from an underlying provider
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid subscription pattern '{}': {}", pattern, reason)
            }
            Error::RegistrySealed => {
                write!(f, "Subscription registry is sealed; registration is closed")
            }
            Error::RegistryOpen => write!(
                f,
                "Subscription registry is still open; seal it before serving streams"
            ),
            Error::AlreadyInitialized(name) => {
                write!(f, "Provider '{}' is already initialized", name)
            }
            Error::NotInitialized(name) => {
                write!(f, "Provider '{}' is not initialized", name)
            }
            Error::UnknownProviderKind(kind) => {
                write!(f, "No provider builder registered for kind '{}'", kind)
            }
            Error::ProviderClosed(name) => write!(f, "Provider '{}' is closed", name),
            Error::Dispatch { stream, failures } => write!(
                f,
                "Fan-out on stream {} failed for {} target(s)",
                stream,
                failures.len()
            ),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
