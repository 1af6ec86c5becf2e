use thiserror::Error;

use crate::session::SessionId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corpus file not found: {0}")]
    CorpusNotFound(std::path::PathBuf),

    #[error("cannot read corpus {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus {0} has no usable entries")]
    EmptyCorpus(String),

    #[error("no contract loaded for {0}")]
    NoContract(SessionId),
}
