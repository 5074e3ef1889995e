//! Subscription pattern matching
//!
//! # Responsibilities
//! - Match a concrete stream id against a declared subscription pattern
//! - Capture the wildcard remainder for target-id substitution
//!
//! # Design Decisions
//! - Three forms only: exact, `<prefix>#`, and bare `#`
//! - A misplaced `#` is rejected at parse time, never at match time
//! - Matching is case-sensitive and byte-exact; no normalization
//! - No regex to guarantee O(n) matching

use crate::error::{Error, Result};

/// Wildcard marker accepted as the final character of a pattern.
pub const WILDCARD: char = '#';

/// A parsed, validated subscription pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches iff the candidate equals the pattern exactly; no capture
    Exact(String),
    /// Matches any candidate starting with the prefix; captures the remainder
    Prefix(String),
    /// Matches every candidate; captures the whole candidate
    Any,
}

/// Successful match result, carrying the wildcard capture if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    /// The candidate remainder matched by the wildcard segment.
    /// `None` for exact patterns, which capture nothing.
    pub capture: Option<&'a str>,
}

impl Pattern {
    /// Parse a raw pattern string, failing fast on unrecognized syntax
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.find(WILDCARD) {
            None => Ok(Pattern::Exact(raw.to_string())),
            Some(pos) if pos == raw.len() - WILDCARD.len_utf8() => {
                let prefix = &raw[..pos];
                if prefix.is_empty() {
                    Ok(Pattern::Any)
                } else {
                    Ok(Pattern::Prefix(prefix.to_string()))
                }
            }
            Some(_) => Err(Error::InvalidPattern {
                pattern: raw.to_string(),
                reason: "wildcard '#' is only valid as the final character",
            }),
        }
    }

    /// Match a candidate stream id against this pattern
    pub fn matches<'a>(&self, candidate: &'a str) -> Option<PatternMatch<'a>> {
        match self {
            Pattern::Exact(pattern) => {
                (candidate == pattern.as_str()).then_some(PatternMatch { capture: None })
            }
            Pattern::Prefix(prefix) => candidate
                .strip_prefix(prefix.as_str())
                .map(|rest| PatternMatch {
                    capture: Some(rest),
                }),
            Pattern::Any => Some(PatternMatch {
                capture: Some(candidate),
            }),
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pattern::Exact(pattern) => write!(f, "{}", pattern),
            Pattern::Prefix(prefix) => write!(f, "{}{}", prefix, WILDCARD),
            Pattern::Any => write!(f, "{}", WILDCARD),
        }
    }
}
