//! Rule-based clause classification against Indian labour and contract law.
//!
//! Category detection uses the ordered keyword table in `sentinel_core`;
//! a handful of categories then get a clause-specific policy check. All other
//! categories are VALID with their law rule as the rationale.

use std::sync::OnceLock;

use regex::Regex;
use sentinel_core::category::contains_any;
use sentinel_core::rules::law_rule;
use sentinel_core::text::{integers, truncate_chars};
use sentinel_core::{Category, ClassifierSettings, Clause, ClauseVerdict, Status, detect_category};

/// Terms that place a non-compete after the employment ends.
const POST_EMPLOYMENT_TERMS: &[&str] = &[
    "after",
    "post-employment",
    "post employment",
    "post-termination",
    "post termination",
    "termination",
    "thereafter",
    "following the end",
];

/// Tokens that mark a stated money amount.
const CURRENCY_TERMS: &[&str] = &["rs.", "rs", "rupees", "inr", "₹", "amount"];

const GENERAL_RATIONALE: &str = "Standard clause, no specific Indian law concerns";

/// Policy outcome before it is attached to a clause.
struct Finding {
    status: Status,
    rationale: String,
    remediation: Option<String>,
}

impl Finding {
    fn new(status: Status, rationale: &str, remediation: Option<&str>) -> Self {
        Self {
            status,
            rationale: rationale.to_string(),
            remediation: remediation.map(str::to_string),
        }
    }
}

/// Maps a clause to a category and emits a verdict.
#[derive(Debug, Clone)]
pub struct ClauseClassifier {
    display_cap: usize,
}

impl Default for ClauseClassifier {
    fn default() -> Self {
        Self::new(&ClassifierSettings::default())
    }
}

impl ClauseClassifier {
    pub fn new(settings: &ClassifierSettings) -> Self {
        Self {
            display_cap: settings.display_cap,
        }
    }

    pub fn classify(&self, clause: &Clause) -> ClauseVerdict {
        let category = detect_category(&clause.text);
        let lower = clause.text.to_lowercase();

        let (finding, citation) = match law_rule(category) {
            Some(rule) => (
                apply_policy(category, &lower)
                    .unwrap_or_else(|| Finding::new(Status::Valid, rule.rule, None)),
                Some(rule.citation.to_string()),
            ),
            None => (Finding::new(Status::Valid, GENERAL_RATIONALE, None), None),
        };

        ClauseVerdict {
            clause_ref: clause.clause_ref(),
            display_text: truncate_chars(&clause.text, self.display_cap),
            category,
            status: finding.status,
            rationale: finding.rationale,
            citation,
            remediation: finding.remediation,
        }
    }

    /// Classify every clause, in order.
    pub fn classify_all(&self, clauses: &[Clause]) -> Vec<ClauseVerdict> {
        clauses.iter().map(|c| self.classify(c)).collect()
    }
}

/// Category-specific check. `None` means "use the rule's default wording".
fn apply_policy(category: Category, lower: &str) -> Option<Finding> {
    match category {
        Category::NonCompete => Some(non_compete(lower)),
        Category::PenaltyClause => Some(penalty(lower)),
        Category::NoticePeriod => Some(notice_period(lower)),
        Category::WorkingHours => Some(working_hours(lower)),
        _ => None,
    }
}

fn non_compete(lower: &str) -> Finding {
    if contains_any(lower, POST_EMPLOYMENT_TERMS) {
        Finding::new(
            Status::Invalid,
            "Post-employment non-compete clauses are void under Section 27 of the Indian \
             Contract Act. Courts in India do not enforce restraint of trade.",
            Some(
                "Remove post-employment non-compete restrictions. Competition can only be \
                 restricted during active employment.",
            ),
        )
    } else {
        Finding::new(
            Status::Risky,
            "A non-compete during employment is valid but must be reasonable in scope.",
            Some("Limit the restriction to direct competition during employment only."),
        )
    }
}

fn penalty(lower: &str) -> Finding {
    if contains_any(lower, CURRENCY_TERMS) {
        Finding::new(
            Status::Risky,
            "Under Section 74, a penalty must be a genuine pre-estimate of loss, not a \
             punishment. Courts may reduce excessive penalties.",
            Some(
                "Replace the fixed penalty with 'reasonable compensation for actual losses \
                 incurred' to comply with Section 74.",
            ),
        )
    } else {
        Finding::new(Status::Valid, "Penalty clause structure is acceptable", None)
    }
}

fn notice_period(lower: &str) -> Finding {
    if three_months_regex().is_match(lower) {
        Finding::new(
            Status::Valid,
            "A 3-month notice period is reasonable under Indian law",
            None,
        )
    } else if six_months_regex().is_match(lower) {
        Finding::new(
            Status::Risky,
            "A 6-month notice period may be considered excessive. Courts prefer 1 to 3 months.",
            Some("Reduce the notice period to 3 months or allow payment in lieu of notice."),
        )
    } else {
        Finding::new(Status::Valid, "Notice period appears reasonable (not verified)", None)
    }
}

fn working_hours(lower: &str) -> Finding {
    let numbers = integers(lower);
    if numbers.iter().any(|n| *n == 48 || *n == 9) {
        Finding::new(
            Status::Valid,
            "Working hours comply with Factories Act / Shops Act limits",
            None,
        )
    } else if numbers.iter().any(|n| (50..=79).contains(n)) {
        Finding::new(
            Status::Invalid,
            "Working hours exceed the legal limits under the Factories Act (48 hours/week, \
             9 hours/day)",
            Some("Reduce to at most 48 hours per week, with overtime paid for additional hours."),
        )
    } else {
        Finding::new(Status::Valid, "Working hours clause is acceptable", None)
    }
}

fn three_months_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(3|three)[\s-]*months?\b|\b90[\s-]*days?\b").unwrap())
}

fn six_months_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(6|six)[\s-]*months?\b|\b180[\s-]*days?\b").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sentinel_core::ClauseRef;

    fn classify(text: &str) -> ClauseVerdict {
        ClauseClassifier::default().classify(&Clause::new(1, text))
    }

    #[test]
    fn post_termination_non_compete_is_invalid() {
        let v = classify("Employee shall not compete with Company within 6 months after termination.");
        assert_eq!(v.category, Category::NonCompete);
        assert_eq!(v.status, Status::Invalid);
        assert_eq!(
            v.citation.as_deref(),
            Some("Indian Contract Act, 1872, Section 27")
        );
        assert!(v.remediation.is_some());
    }

    #[test]
    fn in_employment_non_compete_is_risky() {
        let v = classify("During employment the Employee shall not engage in competing business.");
        assert_eq!(v.category, Category::NonCompete);
        assert_eq!(v.status, Status::Risky);
    }

    #[test]
    fn wages_clause_is_valid_salary_payment() {
        let v = classify("Wages shall be paid monthly.");
        assert_eq!(v.category, Category::SalaryPayment);
        assert_eq!(v.status, Status::Valid);
        assert_eq!(v.citation.as_deref(), Some("Payment of Wages Act, 1936"));
        assert!(v.remediation.is_none());
    }

    #[test]
    fn penalty_without_amount_is_valid() {
        let v = classify("A penalty may apply for wilful misconduct.");
        assert_eq!(v.category, Category::PenaltyClause);
        assert_eq!(v.status, Status::Valid);
    }

    #[test]
    fn notice_period_durations() {
        assert_eq!(classify("Either party shall give three months notice.").status, Status::Valid);
        assert_eq!(classify("Either party shall give 90 days notice.").status, Status::Valid);
        let six = classify("The notice period is 6 months for the employee.");
        assert_eq!(six.status, Status::Risky);
        assert!(six.remediation.is_some());
        assert_eq!(classify("The notice period is 180 days.").status, Status::Risky);
        let other = classify("The notice period is 2 months.");
        assert_eq!(other.status, Status::Valid);
        assert!(other.rationale.contains("not verified"));
    }

    #[test]
    fn working_hours_limits() {
        assert_eq!(
            classify("Working hours are 48 per week with overtime paid.").status,
            Status::Valid
        );
        let long = classify("Working hours shall be 60 per week.");
        assert_eq!(long.category, Category::WorkingHours);
        assert_eq!(long.status, Status::Invalid);
        assert!(long.remediation.is_some());
        assert_eq!(classify("Working hours are 40 per week.").status, Status::Valid);
    }

    #[test]
    fn other_categories_use_rule_text() {
        let v = classify("All disputes go to the courts in Mumbai, which have jurisdiction.");
        assert_eq!(v.category, Category::Jurisdiction);
        assert_eq!(v.status, Status::Valid);
        assert_eq!(v.rationale, "Jurisdiction must be specified.");
    }

    #[test]
    fn general_clause_has_no_citation() {
        let v = classify("This agreement is made between the parties named below.");
        assert_eq!(v.category, Category::General);
        assert_eq!(v.status, Status::Valid);
        assert_eq!(v.citation, None);
    }

    #[test]
    fn display_copy_is_capped_but_ref_is_kept() {
        let long = format!("The Employee shall maintain confidential records. {}", "x".repeat(300));
        let v = ClauseClassifier::default().classify(&Clause::new(7, long));
        assert_eq!(v.clause_ref, ClauseRef(7));
        assert_eq!(v.display_text.chars().count(), 203);
        assert!(v.display_text.ends_with("..."));
    }

    proptest! {
        #[test]
        fn penalty_with_currency_is_risky(
            amount in 1u32..1_000_000,
            token in prop::sample::select(vec!["Rs.", "rupees", "INR", "inr"]),
            payer in prop::sample::select(vec!["the employee", "the contractor", "either party"]),
        ) {
            let text = format!("A penalty of {token} {amount} is payable by {payer} on breach.");
            let v = classify(&text);
            prop_assert_eq!(v.category, Category::PenaltyClause);
            prop_assert_eq!(v.status, Status::Risky);
        }

        #[test]
        fn non_compete_after_termination_is_invalid(prefix in "[a-z ]{0,20}") {
            let text = format!("{prefix} non-compete applies for one year after termination.");
            let v = classify(&text);
            prop_assert_eq!(v.status, Status::Invalid);
            prop_assert!(v.citation.unwrap().contains("Section 27"));
        }
    }
}
