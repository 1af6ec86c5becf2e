//! Risky-clause notes held by a session and summarized for prompts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clause::{ClauseVerdict, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// A clause flagged as risky, from either the risk scan or the compliance
/// classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskNote {
    pub clause_type: String,
    pub risk_level: RiskLevel,
    /// 0..=10, when the source assigns one.
    pub risk_score: Option<u8>,
    pub why: String,
    pub citation: Option<String>,
    pub clause_text: String,
}

impl RiskNote {
    /// Note for a RISKY or INVALID verdict; `None` for VALID ones.
    pub fn from_verdict(verdict: &ClauseVerdict) -> Option<Self> {
        let risk_level = match verdict.status {
            Status::Valid => return None,
            Status::Risky => RiskLevel::Medium,
            Status::Invalid => RiskLevel::High,
        };
        Some(Self {
            clause_type: verdict.category.title().to_string(),
            risk_level,
            risk_score: None,
            why: verdict.rationale.clone(),
            citation: verdict.citation.clone(),
            clause_text: verdict.display_text.clone(),
        })
    }
}
