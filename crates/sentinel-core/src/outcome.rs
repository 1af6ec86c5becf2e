//! Tagged result for operations with a fallback path.
//!
//! Lets callers tell a real semantic match from a keyword-overlap guess, and
//! a generated answer from the canned fallback.

use std::fmt;

use serde::Serialize;

/// Why a fallback path was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Degradation {
    /// No provider configured.
    ProviderUnavailable,
    /// The provider call failed.
    ProviderError(String),
    /// The provider did not answer within the timeout.
    Timeout,
    /// Query or corpus vectors come from the hash fallback, which has no
    /// semantic signal.
    HashEmbedding,
    /// The corpus has no items.
    EmptyCorpus,
    /// Semantic ranking ran but returned nothing.
    EmptyResult,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderUnavailable => f.write_str("provider unavailable"),
            Self::ProviderError(e) => write!(f, "provider error: {e}"),
            Self::Timeout => f.write_str("provider timed out"),
            Self::HashEmbedding => f.write_str("hash-fallback embedding"),
            Self::EmptyCorpus => f.write_str("empty corpus"),
            Self::EmptyResult => f.write_str("empty semantic result"),
        }
    }
}

/// `Ok` (primary path), `Degraded` (fallback produced a value), or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok { value: T },
    Degraded { value: T, reason: Degradation },
    Failed { reason: Degradation },
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self::Ok { value }
    }

    pub fn degraded(value: T, reason: Degradation) -> Self {
        Self::Degraded { value, reason }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok { value } | Self::Degraded { value, .. } => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ok { value } | Self::Degraded { value, .. } => Some(value),
            Self::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&Degradation> {
        match self {
            Self::Ok { .. } => None,
            Self::Degraded { reason, .. } | Self::Failed { reason } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Ok { value } => Outcome::Ok { value: f(value) },
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
            Self::Failed { reason } => Outcome::Failed { reason },
        }
    }
}
