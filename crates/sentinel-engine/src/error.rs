use sentinel_core::ConfigError;
use sentinel_store::{SessionId, StoreError};
use thiserror::Error;

/// Why an uploaded document was refused. Never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputRejection {
    #[error("unsupported document kind '{0}': extract the text first (plain .txt or .md only)")]
    UnsupportedKind(String),

    #[error("document too short: {len} characters, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("no clauses found in document")]
    NoClauses,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("input rejected: {0}")]
    InputRejected(#[from] InputRejection),

    #[error("no contract loaded for {0}, upload a contract first")]
    NoContract(SessionId),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NoContract(id) => Self::NoContract(id),
            other => Self::Store(other),
        }
    }
}
