//! Scoring and classification: lexical and embedding retrieval, the clause
//! classifier, compliance aggregation, the upload risk scan, and salary
//! annexure analysis.

pub mod classifier;
pub mod completion;
pub mod compliance;
pub mod embedder;
pub mod lexical;
pub mod rank;
pub mod risk_scan;
pub mod salary;

pub use classifier::ClauseClassifier;
pub use completion::{Completer, CompletionError};
pub use compliance::ComplianceAggregator;
pub use embedder::{
    EmbedError, Embedder, EmbeddingProvider, HashEmbedder, SourcedEmbedding, cosine_similarity,
};
pub use lexical::KeywordTable;
pub use rank::Hit;
pub use risk_scan::{RiskFinding, RiskOverview, analyze_clause, overall_risk};
pub use salary::{SalaryAnalysis, SalaryComponents, SalaryVerdict};
