//! Contract-level score, risk tier, and missing-clause check.

use sentinel_core::category::contains_any;
use sentinel_core::rules::{MANDATORY_CLAUSES, compliant_template};
use sentinel_core::{
    ClauseVerdict, ComplianceReport, MissingClause, RiskTier, ScoringPolicy, StatusCounts,
};
use tracing::debug;

/// Combines clause verdicts with a whole-document presence check.
#[derive(Debug, Clone, Default)]
pub struct ComplianceAggregator {
    policy: ScoringPolicy,
}

impl ComplianceAggregator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn aggregate(&self, verdicts: Vec<ClauseVerdict>, document_text: &str) -> ComplianceReport {
        let counts = StatusCounts::tally(&verdicts);
        let missing_clauses = missing_clauses(document_text);
        let compliance_score = self.score(&counts);
        let risk_tier = self.tier(&counts, compliance_score);
        let summary = summarize(&counts, compliance_score, missing_clauses.len());

        debug!(
            clauses = counts.total(),
            score = compliance_score,
            tier = %risk_tier,
            missing = missing_clauses.len(),
            "aggregated compliance report"
        );

        ComplianceReport {
            clause_verdicts: verdicts,
            missing_clauses,
            compliance_score,
            risk_tier,
            summary,
        }
    }

    /// Weighted mean of verdict weights, rounded. 0 when there are no clauses.
    pub fn score(&self, counts: &StatusCounts) -> u8 {
        let total = counts.total();
        if total == 0 {
            return 0;
        }
        let p = &self.policy;
        let weighted = p.valid_weight as f64 * counts.valid as f64
            + p.risky_weight as f64 * counts.risky as f64
            + p.invalid_weight as f64 * counts.invalid as f64;
        (weighted / total as f64).round().clamp(0.0, 100.0) as u8
    }

    /// First match wins: High, then Medium, else Low.
    pub fn tier(&self, counts: &StatusCounts, score: u8) -> RiskTier {
        let p = &self.policy;
        if counts.total() == 0 {
            p.empty_tier
        } else if counts.invalid > 0 || score < p.high_below {
            RiskTier::High
        } else if counts.risky > p.medium_risky_above || score < p.medium_below {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// Required mandatory clauses with none of their presence terms in the text.
pub fn missing_clauses(document_text: &str) -> Vec<MissingClause> {
    let lower = document_text.to_lowercase();
    MANDATORY_CLAUSES
        .iter()
        .filter(|spec| spec.required && !contains_any(&lower, spec.presence_terms))
        .map(|spec| MissingClause {
            key: spec.key.to_string(),
            title: spec.title.to_string(),
            rationale: spec.rationale.to_string(),
            required: spec.required,
            template: compliant_template(spec.key).to_string(),
        })
        .collect()
}

fn summarize(counts: &StatusCounts, score: u8, missing: usize) -> String {
    let mut summary = format!(
        "Analyzed {} clauses. {} valid, {} risky, {} invalid. Compliance score: {}/100. ",
        counts.total(),
        counts.valid,
        counts.risky,
        counts.invalid,
        score
    );
    if missing > 0 {
        summary.push_str(&format!("{missing} important clauses are missing."));
    } else {
        summary.push_str("All mandatory clauses present.");
    }
    summary
}
