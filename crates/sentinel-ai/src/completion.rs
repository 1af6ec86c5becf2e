//! Text-completion seam. The engine treats every failure as recoverable.

use async_trait::async_trait;
use thiserror::Error;

const QUOTA_INDICATORS: &[&str] = &[
    "429",
    "resource_exhausted",
    "quota",
    "rate limit",
    "too many requests",
];

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("API key rejected: {0}")]
    InvalidKey(String),

    #[error("response blocked by safety filter")]
    SafetyBlocked,

    #[error("all {0} API keys exhausted")]
    KeysExhausted(usize),

    #[error("no API keys configured")]
    NoKeys,

    #[error("completion timed out after {0}s")]
    Timeout(u64),

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("provider returned no text")]
    Empty,
}

impl CompletionError {
    /// Classify a provider failure from its HTTP status and message.
    pub fn from_response(status: Option<u16>, message: &str) -> Self {
        let lower = message.to_lowercase();
        if status == Some(429) || is_quota_message(&lower) {
            Self::QuotaExhausted(message.to_string())
        } else if status == Some(403) || lower.contains("api_key_invalid") {
            Self::InvalidKey(message.to_string())
        } else if lower.contains("safety") {
            Self::SafetyBlocked
        } else {
            Self::Transport(message.to_string())
        }
    }

    /// Whether trying the next API key could help.
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExhausted(_))
    }

    /// Short label for logs.
    pub fn signal(&self) -> &'static str {
        match self {
            Self::QuotaExhausted(_) => "quota_exhausted",
            Self::InvalidKey(_) => "invalid_key",
            Self::SafetyBlocked => "safety_block",
            Self::KeysExhausted(_) => "keys_exhausted",
            Self::NoKeys => "no_keys",
            Self::Timeout(_) => "timeout",
            Self::Transport(_) => "transport",
            Self::Empty => "empty",
        }
    }
}

fn is_quota_message(lower: &str) -> bool {
    QUOTA_INDICATORS.iter().any(|i| lower.contains(i))
}

/// Prompt in, answer out.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}
