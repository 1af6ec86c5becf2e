//! Static rule tables: one [`LawRule`] per specific category, the mandatory
//! clause checklist, and the compliant clause templates offered when a
//! mandatory clause is missing.

use serde::Serialize;

use crate::category::Category;
use crate::clause::Status;

/// Statute backing a clause category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LawRule {
    pub citation: &'static str,
    pub rule: &'static str,
    pub validity_conditions: &'static str,
    pub default_status: Status,
}

/// Look up the rule for a category. `General` has none.
pub fn law_rule(category: Category) -> Option<&'static LawRule> {
    let rule = match category {
        Category::NonCompete => &NON_COMPETE,
        Category::NoticePeriod => &NOTICE_PERIOD,
        Category::Termination => &TERMINATION,
        Category::SalaryPayment => &SALARY_PAYMENT,
        Category::WorkingHours => &WORKING_HOURS,
        Category::IpOwnership => &IP_OWNERSHIP,
        Category::Confidentiality => &CONFIDENTIALITY,
        Category::PenaltyClause => &PENALTY_CLAUSE,
        Category::Jurisdiction => &JURISDICTION,
        Category::Probation => &PROBATION,
        Category::DataProtection => &DATA_PROTECTION,
        Category::General => return None,
    };
    Some(rule)
}

const NON_COMPETE: LawRule = LawRule {
    citation: "Indian Contract Act, 1872, Section 27",
    rule: "Agreements in restraint of trade are void. Non-compete clauses are generally unenforceable.",
    validity_conditions: "Only enforceable during employment, never after termination",
    default_status: Status::Invalid,
};

const NOTICE_PERIOD: LawRule = LawRule {
    citation: "Industrial Disputes Act, 1947",
    rule: "Notice period must be reasonable and mutual.",
    validity_conditions: "Same period for employer and employee; up to 3 months is reasonable",
    default_status: Status::Valid,
};

const TERMINATION: LawRule = LawRule {
    citation: "Industrial Employment (Standing Orders) Act, 1946",
    rule: "Termination must follow due process.",
    validity_conditions: "Notice or pay in lieu of notice must be provided",
    default_status: Status::Valid,
};

const SALARY_PAYMENT: LawRule = LawRule {
    citation: "Payment of Wages Act, 1936",
    rule: "Wages must be paid on time and deductions must be lawful.",
    validity_conditions: "Monthly payment with no arbitrary deductions",
    default_status: Status::Valid,
};

const WORKING_HOURS: LawRule = LawRule {
    citation: "Factories Act, 1948 / Shops and Establishments Act",
    rule: "Maximum 48 hours per week and 9 hours per day.",
    validity_conditions: "Overtime must be compensated",
    default_status: Status::Valid,
};

const IP_OWNERSHIP: LawRule = LawRule {
    citation: "Copyright Act, 1957",
    rule: "Work created in the course of employment belongs to the employer.",
    validity_conditions: "Limited to work-related creations made during employment",
    default_status: Status::Valid,
};

const CONFIDENTIALITY: LawRule = LawRule {
    citation: "Indian Contract Act, 1872, Section 27",
    rule: "Confidentiality obligations are valid.",
    validity_conditions: "Must be reasonable in scope and duration",
    default_status: Status::Valid,
};

const PENALTY_CLAUSE: LawRule = LawRule {
    citation: "Indian Contract Act, 1872, Section 74",
    rule: "Penalty clauses must provide reasonable compensation, not punishment.",
    validity_conditions: "Amount must be proportionate to the actual loss",
    default_status: Status::Risky,
};

const JURISDICTION: LawRule = LawRule {
    citation: "Code of Civil Procedure, 1908",
    rule: "Jurisdiction must be specified.",
    validity_conditions: "Should name Indian courts",
    default_status: Status::Valid,
};

const PROBATION: LawRule = LawRule {
    citation: "Industrial Employment (Standing Orders) Act, 1946",
    rule: "Probation periods are valid.",
    validity_conditions: "Typically 3 to 6 months, at most 1 year",
    default_status: Status::Valid,
};

const DATA_PROTECTION: LawRule = LawRule {
    citation: "Information Technology Act, 2000 (SPDI Rules, 2011)",
    rule: "Sensitive personal data must be handled with consent.",
    validity_conditions: "Requires a clear privacy policy and consent mechanism",
    default_status: Status::Valid,
};

/// A clause every employment contract is checked for, by presence in the
/// whole document rather than per clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MandatoryClauseSpec {
    /// Template key, see [`compliant_template`].
    pub key: &'static str,
    pub title: &'static str,
    pub required: bool,
    pub rationale: &'static str,
    /// Lowercase terms; any one present counts as the clause being present.
    pub presence_terms: &'static [&'static str],
}

pub const MANDATORY_CLAUSES: &[MandatoryClauseSpec] = &[
    MandatoryClauseSpec {
        key: "governing_law",
        title: "Governing Law",
        required: true,
        rationale: "Must specify that Indian law governs the contract",
        presence_terms: &["governing law"],
    },
    MandatoryClauseSpec {
        key: "jurisdiction",
        title: "Jurisdiction",
        required: true,
        rationale: "Must specify which Indian courts have jurisdiction",
        presence_terms: &["jurisdiction"],
    },
    MandatoryClauseSpec {
        key: "dispute_resolution",
        title: "Dispute Resolution / Arbitration",
        required: true,
        rationale: "Expected under the Arbitration and Conciliation Act, 1996",
        presence_terms: &["arbitration", "dispute"],
    },
    MandatoryClauseSpec {
        key: "confidentiality",
        title: "Confidentiality",
        required: false,
        rationale: "Recommended for protecting business information",
        presence_terms: &["confidential"],
    },
    MandatoryClauseSpec {
        key: "ip_ownership",
        title: "Intellectual Property Ownership",
        required: false,
        rationale: "Clarifies ownership of work created during employment",
        presence_terms: &["intellectual property", "copyright"],
    },
    MandatoryClauseSpec {
        key: "termination_clause",
        title: "Termination Clause",
        required: true,
        rationale: "Must specify notice period and termination conditions",
        presence_terms: &["termination"],
    },
    MandatoryClauseSpec {
        key: "data_protection",
        title: "Data Protection / Privacy",
        required: false,
        rationale: "Expected under the IT Act when sensitive personal data is collected",
        presence_terms: &["personal data", "data protection", "privacy"],
    },
];

/// Placeholder for template keys with no authored text.
pub const COUNSEL_PLACEHOLDER: &str = "Clause text to be drafted by legal counsel.";

/// Pre-authored compliant clause text for a mandatory clause key.
pub fn compliant_template(key: &str) -> &'static str {
    match key {
        "governing_law" => {
            "This Agreement shall be governed by and construed in accordance with the laws of India."
        }
        "jurisdiction" => {
            "The courts at [City], India shall have exclusive jurisdiction over any dispute \
             arising out of or in connection with this Agreement."
        }
        "dispute_resolution" => {
            "Any dispute arising out of or in connection with this Agreement shall be referred to \
             arbitration under the Arbitration and Conciliation Act, 1996. The seat of arbitration \
             shall be [City], India and the language of the proceedings shall be English."
        }
        "confidentiality" => {
            "The Employee shall keep confidential all proprietary and confidential information of \
             the Company during and after employment. This obligation survives termination of \
             this Agreement."
        }
        "ip_ownership" => {
            "All intellectual property developed by the Employee in the course of employment and \
             relating to the Company's business shall be the exclusive property of the Company."
        }
        "termination_clause" => {
            "Either party may terminate this Agreement by giving [30/60/90] days' written notice \
             to the other. The Company may terminate immediately for gross misconduct or material \
             breach."
        }
        "data_protection" => {
            "The Company shall process the Employee's personal data in accordance with the \
             Information Technology (Reasonable Security Practices and Procedures and Sensitive \
             Personal Data or Information) Rules, 2011."
        }
        _ => COUNSEL_PLACEHOLDER,
    }
}
