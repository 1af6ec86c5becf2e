//! Lightweight risk scan for the upload flow.
//!
//! Separate from [`crate::classifier`]: five detectors, tried in order, each
//! keyed on a phrase list. The first detector that fires describes the clause.

use sentinel_core::category::contains_any;
use sentinel_core::{RiskLevel, RiskNote};
use serde::Serialize;

/// One risk pattern and the advice attached to it.
#[derive(Debug)]
pub struct RiskDetector {
    pub clause_type: &'static str,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub citation: &'static str,
    pub keywords: &'static [&'static str],
    pub why_risky: &'static str,
    pub user_actions: &'static [&'static str],
    pub safer_rewrite: &'static str,
}

/// Detectors in evaluation order.
pub const DETECTORS: &[RiskDetector] = &[
    RiskDetector {
        clause_type: "Non-Compete / Restraint of Trade",
        risk_level: RiskLevel::High,
        risk_score: 9,
        citation: "Section 27, Indian Contract Act, 1872",
        keywords: &[
            "non-compete",
            "non compete",
            "noncompete",
            "restraint of trade",
            "shall not engage",
            "shall not compete",
            "prohibited from engaging",
            "restrict",
            "covenant not to compete",
            "not to carry on",
        ],
        why_risky: "Non-compete clauses are generally void under Indian law. Section 27 makes any \
                    agreement that restrains someone from a lawful profession, trade, or business \
                    void, so you cannot be legally prevented from working in your field after \
                    leaving.",
        user_actions: &[
            "Request complete removal of this clause",
            "If the employer insists, offer a confidentiality agreement instead",
            "Consult a lawyer: this clause is likely unenforceable in India",
            "Do not sign without legal advice if this clause remains",
        ],
        safer_rewrite: "The Employee agrees to maintain confidentiality of all proprietary \
                        information and trade secrets for a period of 2 years after termination. \
                        This does not restrict the Employee's right to work in similar roles or \
                        industries.",
    },
    RiskDetector {
        clause_type: "Penalty Clause",
        risk_level: RiskLevel::High,
        risk_score: 8,
        citation: "Section 74, Indian Contract Act, 1872",
        keywords: &[
            "penalty",
            "penalties",
            "penal",
            "forfeit",
            "a fine",
            "fine of",
            "fines of",
            "punitive damages",
        ],
        why_risky: "Under Section 74 only reasonable compensation for actual loss can be claimed. \
                    If the amount is punitive rather than compensatory, courts will not enforce \
                    it.",
        user_actions: &[
            "Ask to change 'penalty' to 'liquidated damages'",
            "Make sure the amount is proportionate to the likely actual loss",
            "Ask for a clear calculation basis for the damages",
            "Negotiate a cap on the amount",
            "Seek legal advice if the amount seems excessive",
        ],
        safer_rewrite: "In case of breach, the Employee shall pay reasonable compensation for \
                        actual losses suffered by the Company, not exceeding [reasonable amount \
                        based on salary/project value]. This is a genuine pre-estimate of loss, \
                        not a penalty.",
    },
    RiskDetector {
        clause_type: "Unlimited Liability / Indemnity",
        risk_level: RiskLevel::High,
        risk_score: 9,
        citation: "Section 23, Indian Contract Act, 1872",
        keywords: &[
            "unlimited liability",
            "indemnify",
            "indemnification",
            "hold harmless",
            "liability without limit",
            "unconditional liability",
            "absolute liability",
            "shall be liable for all",
        ],
        why_risky: "Unlimited liability exposes you to open-ended financial risk. Section 23 voids \
                    agreements against public policy, and courts may treat unlimited liability \
                    as unconscionable.",
        user_actions: &[
            "Negotiate a reasonable cap on liability (for example 3 to 6 months of salary)",
            "Limit liability to direct damages only",
            "Exclude liability for matters beyond your control",
            "Ask for mutual liability limits",
        ],
        safer_rewrite: "The Employee's total liability under this agreement shall be limited to \
                        direct damages only and shall not exceed three months of the Employee's \
                        gross salary. The Employee shall not be liable for indirect, \
                        consequential, or punitive damages.",
    },
    RiskDetector {
        clause_type: "Unfair Termination Clause",
        risk_level: RiskLevel::Medium,
        risk_score: 6,
        citation: "Industrial Disputes Act, 1947",
        keywords: &[
            "terminate without cause",
            "termination without reason",
            "terminate at will",
            "immediate termination",
            "terminate without notice",
            "no notice period",
            "termination at sole discretion",
        ],
        why_risky: "Termination without notice or cause can leave you suddenly unemployed. Indian \
                    labour law generally expects a notice period and just cause.",
        user_actions: &[
            "Negotiate a minimum notice period (30 to 90 days is standard)",
            "Ask for severance pay if terminated without cause",
            "Ask for a clear definition of 'cause'",
            "Make sure you can also leave with notice",
        ],
        safer_rewrite: "Either party may terminate this agreement with 60 days written notice. \
                        Termination without notice is only permitted for serious misconduct as \
                        defined in the Employee Handbook. If terminated without cause, the \
                        Employee shall receive severance pay equal to the notice period.",
    },
    RiskDetector {
        clause_type: "Intellectual Property Transfer",
        risk_level: RiskLevel::Medium,
        risk_score: 6,
        citation: "Copyright Act, 1957",
        keywords: &[
            "intellectual property",
            "ip rights",
            "ownership",
            "assign",
            "all rights",
            "transfer of rights",
            "copyright",
            "patent",
            "trademark",
            "work for hire",
            "work made for hire",
        ],
        why_risky: "Broad IP transfer can claim everything you create, including personal projects \
                    outside work hours. Only IP tied to your duties and made with company \
                    resources should be assigned.",
        user_actions: &[
            "Limit the transfer to work done during working hours",
            "Exclude personal projects and pre-existing IP",
            "Keep a list of your pre-existing IP before joining",
        ],
        safer_rewrite: "The Employee assigns to the Company all intellectual property created \
                        during working hours, using Company resources, and directly related to \
                        the Company's business. Personal projects and IP created outside working \
                        hours using own resources remain the Employee's property.",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFinding {
    pub clause_text: String,
    pub clause_type: String,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub citation: String,
    pub why_risky: String,
    pub user_actions: Vec<String>,
    pub safer_rewrite: String,
    /// `why_risky` reworded in plain language by a completion provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_explanation: Option<String>,
}

impl RiskFinding {
    fn new(detector: &RiskDetector, clause_text: &str) -> Self {
        Self {
            clause_text: clause_text.to_string(),
            clause_type: detector.clause_type.to_string(),
            risk_level: detector.risk_level,
            risk_score: detector.risk_score,
            citation: detector.citation.to_string(),
            why_risky: detector.why_risky.to_string(),
            user_actions: detector.user_actions.iter().map(|s| s.to_string()).collect(),
            safer_rewrite: detector.safer_rewrite.to_string(),
            plain_explanation: None,
        }
    }

    /// The explanation to show: the plain rewording when there is one.
    pub fn explanation(&self) -> &str {
        self.plain_explanation.as_deref().unwrap_or(&self.why_risky)
    }

    /// Request to reword `why_risky` without changing its substance.
    pub fn explanation_prompt(&self) -> String {
        format!(
            "You are helping explain a contract clause to an Indian employee with no legal \
             background.\n\n\
             STRICT RULES:\n\
             1. DO NOT add new legal interpretations\n\
             2. DO NOT change the risk level\n\
             3. DO NOT mention laws other than the one provided\n\
             4. ONLY rewrite the explanation in simpler, more conversational language\n\
             5. Keep the same meaning, just make it easier to understand\n\n\
             GIVEN INFORMATION:\n\
             Clause Type: {}\n\
             Risk Level: {} (DO NOT CHANGE THIS)\n\
             Risk Score: {}/10 (DO NOT CHANGE THIS)\n\
             Law Reference: {}\n\
             Original Explanation: {}\n\n\
             TASK: Rewrite the explanation in 2-3 simple sentences that a non-lawyer can \
             understand.\n\n\
             Simplified Explanation:",
            self.clause_type, self.risk_level, self.risk_score, self.citation, self.why_risky
        )
    }

    /// The session-level note for this finding.
    pub fn to_note(&self) -> RiskNote {
        RiskNote {
            clause_type: self.clause_type.clone(),
            risk_level: self.risk_level,
            risk_score: Some(self.risk_score),
            why: self.explanation().to_string(),
            citation: Some(self.citation.clone()),
            clause_text: self.clause_text.clone(),
        }
    }
}

/// Scan one clause. `None` when no detector fires.
pub fn analyze_clause(text: &str) -> Option<RiskFinding> {
    let lower = text.to_lowercase();
    DETECTORS
        .iter()
        .find(|d| contains_any(&lower, d.keywords))
        .map(|d| RiskFinding::new(d, text))
}

/// Contract-wide view of a risk scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskOverview {
    /// Mean finding score, one decimal place.
    pub score: f32,
    pub level: RiskLevel,
    pub findings: usize,
}

/// Mean finding score: `>= 8` High, `>= 5` Medium, else Low.
pub fn overall_risk(findings: &[RiskFinding]) -> RiskOverview {
    if findings.is_empty() {
        return RiskOverview {
            score: 0.0,
            level: RiskLevel::Low,
            findings: 0,
        };
    }

    let total: u32 = findings.iter().map(|f| u32::from(f.risk_score)).sum();
    let mean = total as f64 / findings.len() as f64;
    let score = (mean * 10.0).round() / 10.0;
    let level = if score >= 8.0 {
        RiskLevel::High
    } else if score >= 5.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskOverview {
        score: score as f32,
        level,
        findings: findings.len(),
    }
}
