//! Storage layer: static statute/reference corpora and per-session contracts.

pub mod corpus;
mod error;
pub mod session;

pub use corpus::{CorpusStats, KnowledgeBase};
pub use error::StoreError;
pub use session::{SessionContext, SessionId, SessionStore};
