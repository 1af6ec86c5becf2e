//! Keyword-expansion scoring with a word-overlap fallback.
//!
//! A [`KeywordTable`] maps query keywords to related terms. Every related term
//! of a keyword present in the query that also appears in the candidate adds
//! `hit_weight`. When no related term is found at all, the score falls back to
//! `overlap_weight` per shared whitespace token. Zero means "excluded".

use sentinel_core::category::contains_term;
use sentinel_core::text::word_set;

use crate::rank::{self, Hit};

pub type KeywordRules = &'static [(&'static str, &'static [&'static str])];

#[derive(Debug, Clone, Copy)]
pub struct KeywordTable {
    pub name: &'static str,
    pub rules: KeywordRules,
    pub hit_weight: u32,
    pub overlap_weight: u32,
}

const CONTRACT_RULES: KeywordRules = &[
    (
        "confidential",
        &["confidential", "secret", "privacy", "disclosure", "nda", "confidentiality"],
    ),
    (
        "non-compete",
        &["compete", "competitor", "restraint", "work with", "non-compete", "noncompete", "competing"],
    ),
    (
        "payment",
        &["payment", "salary", "wage", "compensation", "fee", "amount", "money", "due", "paid", "pay"],
    ),
    (
        "paid",
        &["payment", "salary", "wage", "compensation", "fee", "amount", "money", "due", "paid", "pay"],
    ),
    ("terminate", &["terminate", "termination", "end", "cancel", "notice", "exit"]),
    (
        "termination",
        &["terminate", "termination", "end", "cancel", "notice", "exit", "leave"],
    ),
    (
        "penalty",
        &["penalty", "fine", "loss", "damage", "breach", "rupees", "rs", "compensation"],
    ),
    (
        "working",
        &["work", "work with", "employee", "freelancer", "compete", "competitor", "engage"],
    ),
    ("clause", &["clause", "agreement", "contract", "term", "section"]),
    (
        "risk",
        &["risk", "risky", "dangerous", "problem", "issue", "careful", "non-compete", "restraint"],
    ),
    (
        "risky",
        &["risk", "risky", "dangerous", "problem", "issue", "careful", "non-compete", "restraint"],
    ),
    ("liability", &["liable", "liability", "responsible", "indemnify", "breach"]),
    ("duration", &["duration", "period", "time", "months", "years", "how long"]),
    ("obligations", &["obligation", "must", "required", "shall", "should"]),
    ("notice", &["notice", "resignation", "months", "days"]),
    ("end", &["terminate", "termination", "end", "cancel", "notice", "exit"]),
];

const STATUTE_RULES: KeywordRules = &[
    ("non-compete", &["section 27", "restraint of trade"]),
    ("non compete", &["section 27", "restraint of trade"]),
    ("noncompete", &["section 27", "restraint of trade"]),
    ("restraint", &["section 27"]),
    ("penalty", &["section 74", "compensation"]),
    ("liquidated damages", &["section 74"]),
    ("forfeit", &["section 74"]),
    ("liability", &["section 23", "unlawful"]),
    ("indemnify", &["section 23"]),
    ("breach", &["section 73", "compensation"]),
    ("damages", &["section 73", "section 74"]),
    ("compensation", &["section 73", "section 74"]),
    ("valid", &["section 10"]),
    ("contract", &["section 10"]),
    ("agreement", &["section 10"]),
    ("consent", &["section 19", "section 16"]),
    ("coercion", &["section 19"]),
    ("fraud", &["section 19"]),
    ("undue influence", &["section 16"]),
    ("void", &["section 23", "section 27", "section 65"]),
    ("confidential", &["nda", "confidentiality"]),
    ("nda", &["non-disclosure", "confidential"]),
    ("secret", &["confidential", "proprietary"]),
    ("disclos", &["nda", "confidential"]),
    ("working hours", &["factories act", "48 hours"]),
    ("overtime", &["factories act", "overtime"]),
    ("wage", &["payment of wages"]),
    ("salary", &["payment of wages"]),
    ("notice", &["industrial disputes act", "notice"]),
    ("copyright", &["copyright act"]),
    ("personal data", &["information technology act"]),
];

/// Session contract clauses: heavy keyword weight, doubled overlap.
pub const CONTRACT_TERMS: KeywordTable = KeywordTable {
    name: "contract",
    rules: CONTRACT_RULES,
    hit_weight: 20,
    overlap_weight: 2,
};

/// Statute sections, keyed to section numbers and act names.
pub const STATUTE_TERMS: KeywordTable = KeywordTable {
    name: "statute",
    rules: STATUTE_RULES,
    hit_weight: 10,
    overlap_weight: 1,
};

/// Reference clauses share the statute keywords but weight overlap like
/// contract text.
pub const REFERENCE_TERMS: KeywordTable = KeywordTable {
    name: "reference",
    rules: STATUTE_RULES,
    hit_weight: 10,
    overlap_weight: 2,
};

impl KeywordTable {
    /// Score `candidate` against `query`. Deterministic; zero means no match.
    pub fn score(&self, query: &str, candidate: &str) -> u32 {
        let query = query.to_lowercase();
        let candidate = candidate.to_lowercase();

        let hits: u32 = self
            .rules
            .iter()
            .filter(|(keyword, _)| query.contains(keyword))
            .flat_map(|(_, related)| related.iter())
            .filter(|term| contains_term(&candidate, term))
            .map(|_| self.hit_weight)
            .sum();

        if hits > 0 {
            return hits;
        }

        let query_words = word_set(&query);
        let shared = word_set(&candidate)
            .iter()
            .filter(|w| query_words.contains(*w))
            .count() as u32;
        shared * self.overlap_weight
    }

    /// Rank `items` by score, dropping zero scores. Stable, at most `top_k`.
    pub fn rank<'a, T>(
        &self,
        query: &str,
        items: &'a [T],
        text: impl Fn(&T) -> &str,
        top_k: usize,
    ) -> Vec<Hit<'a, T>> {
        let hits = items
            .iter()
            .filter_map(|item| {
                let score = self.score(query, text(item));
                (score > 0).then_some(Hit {
                    item,
                    score: score as f32,
                })
            })
            .collect();
        rank::top_k(hits, top_k)
    }
}
