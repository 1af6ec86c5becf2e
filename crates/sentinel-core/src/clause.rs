//! Clauses and the per-clause verdicts produced by the classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A contiguous span of contract text treated as one analyzable unit.
///
/// Created when a document is split and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// 1-based position in the source document.
    pub index: usize,
    pub text: String,
}

impl Clause {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Number a list of raw clause texts from 1.
    pub fn numbered<I, S>(texts: I) -> Vec<Clause>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| Clause::new(i + 1, t))
            .collect()
    }

    pub fn clause_ref(&self) -> ClauseRef {
        ClauseRef(self.index)
    }
}

/// Handle back to the full clause text held by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClauseRef(pub usize);

impl fmt::Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clause {}", self.0)
    }
}

/// Verdict status for a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Valid,
    Risky,
    Invalid,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Risky => "RISKY",
            Self::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result for one clause. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseVerdict {
    pub clause_ref: ClauseRef,
    /// Display copy of the clause, capped with an ellipsis.
    pub display_text: String,
    pub category: Category,
    pub status: Status,
    pub rationale: String,
    pub citation: Option<String>,
    pub remediation: Option<String>,
}

impl ClauseVerdict {
    pub fn is_flagged(&self) -> bool {
        self.status != Status::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_starts_at_one() {
        let clauses = Clause::numbered(["first clause text", "second clause text"]);
        assert_eq!(clauses[0].index, 1);
        assert_eq!(clauses[1].index, 2);
        assert_eq!(clauses[1].clause_ref(), ClauseRef(2));
    }

    #[test]
    fn status_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Status::Invalid).unwrap(), "\"INVALID\"");
        assert_eq!(Status::Risky.to_string(), "RISKY");
    }
}
