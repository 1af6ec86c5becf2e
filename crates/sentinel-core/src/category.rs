//! Clause categories and the ordered keyword table used to detect them.
//!
//! Detection walks [`CATEGORY_PRECEDENCE`] top to bottom and returns the first
//! category whose keyword group matches. Order matters: several groups share
//! vocabulary ("termination" appears in notice clauses, "compensation" in
//! penalty clauses), so the earlier group wins.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of clause categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NonCompete,
    NoticePeriod,
    Termination,
    SalaryPayment,
    WorkingHours,
    IpOwnership,
    Confidentiality,
    PenaltyClause,
    Jurisdiction,
    Probation,
    DataProtection,
    General,
}

impl Category {
    /// Every category, in detection precedence order (`General` last).
    pub const ALL: [Category; 12] = [
        Self::NonCompete,
        Self::NoticePeriod,
        Self::Termination,
        Self::SalaryPayment,
        Self::WorkingHours,
        Self::IpOwnership,
        Self::Confidentiality,
        Self::PenaltyClause,
        Self::Jurisdiction,
        Self::Probation,
        Self::DataProtection,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonCompete => "non_compete",
            Self::NoticePeriod => "notice_period",
            Self::Termination => "termination",
            Self::SalaryPayment => "salary_payment",
            Self::WorkingHours => "working_hours",
            Self::IpOwnership => "ip_ownership",
            Self::Confidentiality => "confidentiality",
            Self::PenaltyClause => "penalty_clause",
            Self::Jurisdiction => "jurisdiction",
            Self::Probation => "probation",
            Self::DataProtection => "data_protection",
            Self::General => "general",
        }
    }

    /// Human-readable title, e.g. "Non Compete".
    pub fn title(&self) -> &'static str {
        match self {
            Self::NonCompete => "Non Compete",
            Self::NoticePeriod => "Notice Period",
            Self::Termination => "Termination",
            Self::SalaryPayment => "Salary Payment",
            Self::WorkingHours => "Working Hours",
            Self::IpOwnership => "Ip Ownership",
            Self::Confidentiality => "Confidentiality",
            Self::PenaltyClause => "Penalty Clause",
            Self::Jurisdiction => "Jurisdiction",
            Self::Probation => "Probation",
            Self::DataProtection => "Data Protection",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered `(category, keywords)` pairs. First matching group wins.
pub const CATEGORY_PRECEDENCE: &[(Category, &[&str])] = &[
    (
        Category::NonCompete,
        &[
            "non-compete",
            "non compete",
            "noncompete",
            "restraint of trade",
            "competing",
            "covenant not to compete",
            "not to compete",
            "shall not compete",
            "compete with",
        ],
    ),
    (
        Category::NoticePeriod,
        &["notice period", "notice", "resignation"],
    ),
    (
        Category::Termination,
        &["termination", "terminate", "dismissal"],
    ),
    (
        Category::SalaryPayment,
        &["salary", "wages", "payment", "compensation"],
    ),
    (
        Category::WorkingHours,
        &["working hours", "work hours", "overtime"],
    ),
    (
        Category::IpOwnership,
        &["intellectual property", "ip", "copyright", "patent"],
    ),
    (
        Category::Confidentiality,
        &["confidential", "nda", "proprietary", "trade secret"],
    ),
    (
        Category::PenaltyClause,
        &["penalty", "liquidated damages", "forfeit"],
    ),
    (Category::Jurisdiction, &["jurisdiction", "court", "venue"]),
    (Category::Probation, &["probation", "probationary"]),
    (
        Category::DataProtection,
        &["data privacy", "data protection", "personal data", "spdi"],
    ),
];

/// Detect the category of a clause. Falls back to [`Category::General`].
pub fn detect_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    CATEGORY_PRECEDENCE
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

/// True if any term occurs in `haystack` (see [`contains_term`]).
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| contains_term(haystack, t))
}

/// Case-sensitive substring test with word-boundary guards for short terms.
///
/// Terms of three characters or fewer (`ip`, `nda`, `inr`, `rs.`) only match
/// where the neighbouring characters are not alphanumeric. The guard applies
/// on a side only when the term itself starts/ends with an alphanumeric, so
/// `rs.` still matches `rs.5000`.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.chars().count() > 3 {
        return haystack.contains(term);
    }

    let guard_start = term.chars().next().is_some_and(char::is_alphanumeric);
    let guard_end = term.chars().last().is_some_and(char::is_alphanumeric);

    haystack.match_indices(term).any(|(at, _)| {
        let before_ok = !guard_start
            || haystack[..at]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = !guard_end
            || haystack[at + term.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
