//! Contract-level compliance report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clause::{ClauseVerdict, Status};

/// Coarse bucket summarizing a contract's overall posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required clause that the document does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingClause {
    pub key: String,
    pub title: String,
    pub rationale: String,
    pub required: bool,
    /// Compliant clause text the drafter can insert.
    pub template: String,
}

/// Derived on every validation call; never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub clause_verdicts: Vec<ClauseVerdict>,
    pub missing_clauses: Vec<MissingClause>,
    /// 0..=100
    pub compliance_score: u8,
    pub risk_tier: RiskTier,
    pub summary: String,
}

/// Verdict counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub valid: usize,
    pub risky: usize,
    pub invalid: usize,
}

impl StatusCounts {
    pub fn tally(verdicts: &[ClauseVerdict]) -> Self {
        let mut counts = Self::default();
        for v in verdicts {
            match v.status {
                Status::Valid => counts.valid += 1,
                Status::Risky => counts.risky += 1,
                Status::Invalid => counts.invalid += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.valid + self.risky + self.invalid
    }
}

impl ComplianceReport {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.clause_verdicts)
    }

    /// Verdicts that are RISKY or INVALID.
    pub fn flagged(&self) -> impl Iterator<Item = &ClauseVerdict> {
        self.clause_verdicts.iter().filter(|v| v.is_flagged())
    }
}
