pub mod category;
pub mod clause;
pub mod config;
pub mod corpus;
mod error;
pub mod outcome;
pub mod report;
pub mod risk;
pub mod rules;
pub mod split;
pub mod text;

pub use category::{Category, detect_category};
pub use clause::{Clause, ClauseRef, ClauseVerdict, Status};
pub use config::{ClassifierSettings, ProviderSettings, RetrievalLimits, ScoringPolicy, SentinelConfig};
pub use corpus::{Corpus, CorpusKind, EmbeddingSource, ItemMetadata, VectorItem};
pub use error::ConfigError;
pub use outcome::{Degradation, Outcome};
pub use report::{ComplianceReport, MissingClause, RiskTier, StatusCounts};
pub use risk::{RiskLevel, RiskNote};
pub use rules::{LawRule, MandatoryClauseSpec};
pub use split::split_into_clauses;
