//! Context bundle assembly for a single question.
//!
//! The question is embedded once. Each corpus is then ranked on its own:
//! semantically when the question embedding and the corpus come from the same
//! live provider, lexically otherwise. A failure in one corpus never affects
//! the other two. Every
//! block is rendered to a bounded string, and empty results render to a
//! fixed "no relevant ..." sentence so the prompt always has the same shape.

use sentinel_ai::embedder;
use sentinel_ai::lexical::{CONTRACT_TERMS, REFERENCE_TERMS, STATUTE_TERMS};
use sentinel_ai::{Embedder, KeywordTable, SourcedEmbedding};
use sentinel_core::text::{sanitize, truncate_chars};
use sentinel_core::{
    Category, Corpus, Degradation, Outcome, RetrievalLimits, RiskLevel, RiskNote, VectorItem,
    detect_category,
};
use sentinel_store::{KnowledgeBase, SessionContext};
use serde::Serialize;
use tracing::{debug, warn};

pub const NO_STATUTES: &str = "No relevant law sections found.";
pub const NO_CONTRACT_CLAUSES: &str = "No relevant contract clauses found.";
pub const NO_RISKY_CLAUSES: &str = "No risky clauses detected in this contract.";
pub const NO_REFERENCES: &str = "No specific knowledge base items found for this question.";

const RISK_WORDS: &[&str] = &["risk", "risky", "dangerous", "problem", "issue"];

/// The fixed-shape text handed to the prompt builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextBundle {
    pub statute_text: String,
    pub contract_text: String,
    pub reference_text: String,
    pub risky_summary: String,
    /// How each corpus was ranked, with the hit count.
    pub provenance: Provenance,
    /// The risky summary was guessed from retrieved clauses rather than
    /// taken from the session.
    pub heuristic_risks: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub statutes: Outcome<usize>,
    pub references: Outcome<usize>,
    pub contract: Outcome<usize>,
}

/// Builds a [`ContextBundle`] from the static corpora and one session.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder<'a> {
    embedder: &'a Embedder,
    limits: &'a RetrievalLimits,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(embedder: &'a Embedder, limits: &'a RetrievalLimits) -> Self {
        Self { embedder, limits }
    }

    pub async fn build(
        &self,
        question: &str,
        knowledge: &KnowledgeBase,
        session: &SessionContext,
    ) -> ContextBundle {
        // One provider call per question, shared by all three corpora.
        let query = match self.embedder.live_source() {
            Some(_) => Some(self.embedder.embed(question).await),
            None => None,
        };
        let query = query.as_ref();

        let statutes = self.rank_corpus(
            question,
            query,
            &knowledge.statutes,
            &STATUTE_TERMS,
            self.limits.statute_top_k,
        );
        let references = self.rank_corpus(
            question,
            query,
            &knowledge.references,
            &REFERENCE_TERMS,
            self.limits.reference_top_k,
        );
        let contract = self.rank_corpus(
            question,
            query,
            &session.corpus,
            &CONTRACT_TERMS,
            self.limits.contract_top_k,
        );

        let statute_text = render(&statutes, NO_STATUTES, |_, item| {
            let (title, body) = split_title(item);
            format!("{}\n{}", sanitize(title), self.bounded(body))
        });
        let reference_text = render(&references, NO_REFERENCES, |_, item| {
            let (title, body) = split_title(item);
            format!("[Reference - {}]\n{}", sanitize(title), self.bounded(body))
        });
        let contract_text = render(&contract, NO_CONTRACT_CLAUSES, |i, item| {
            format!("Clause {i}: {}", self.bounded(&item.text))
        });

        let mut risky_summary = risky_clause_summary(&session.risky, self.limits.risky_excerpt_chars);
        let mut heuristic_risks = false;
        let retrieved: Vec<&VectorItem> = contract.value().cloned().unwrap_or_default();
        if is_risk_question(question) && session.risky.is_empty() && !retrieved.is_empty() {
            risky_summary = heuristic_risk_summary(&retrieved, self.limits.heuristic_excerpt_chars);
            heuristic_risks = true;
        }

        ContextBundle {
            statute_text,
            contract_text,
            reference_text,
            risky_summary,
            provenance: Provenance {
                statutes: statutes.map(|h| h.len()),
                references: references.map(|h| h.len()),
                contract: contract.map(|h| h.len()),
            },
            heuristic_risks,
        }
    }

    fn bounded(&self, text: &str) -> String {
        truncate_chars(&sanitize(text), self.limits.block_chars)
    }

    /// Rank one corpus, failing over to keyword scoring.
    ///
    /// `query` is the question embedding, `None` when there is no live
    /// provider.
    fn rank_corpus<'c>(
        &self,
        question: &str,
        query: Option<&Outcome<SourcedEmbedding>>,
        corpus: &'c Corpus,
        table: &KeywordTable,
        top_k: usize,
    ) -> Outcome<Vec<&'c VectorItem>> {
        if corpus.is_empty() {
            return Outcome::degraded(Vec::new(), Degradation::EmptyCorpus);
        }

        let lexical = |reason: Degradation| {
            let hits: Vec<&VectorItem> = table
                .rank(question, &corpus.items, |i| i.text.as_str(), top_k)
                .into_iter()
                .map(|h| h.item)
                .collect();
            debug!(corpus = %corpus.kind, table = table.name, hits = hits.len(), reason = %reason, "lexical ranking");
            Outcome::degraded(hits, reason)
        };

        let query = match query {
            Some(Outcome::Ok { value }) => value,
            Some(other) => {
                let reason = other.reason().cloned().unwrap_or(Degradation::HashEmbedding);
                warn!(corpus = %corpus.kind, reason = %reason, "query embedding degraded, using keyword ranking");
                return lexical(reason);
            }
            None => return lexical(Degradation::HashEmbedding),
        };
        if corpus.embedding_source() != Some(&query.source) {
            return lexical(Degradation::HashEmbedding);
        }

        let hits: Vec<&VectorItem> = embedder::rank(&query.vector, &corpus.items, top_k)
            .into_iter()
            .map(|h| h.item)
            .collect();
        if hits.is_empty() {
            return lexical(Degradation::EmptyResult);
        }
        debug!(corpus = %corpus.kind, hits = hits.len(), "semantic ranking");
        Outcome::ok(hits)
    }
}

fn render(
    hits: &Outcome<Vec<&VectorItem>>,
    empty: &str,
    block: impl Fn(usize, &VectorItem) -> String,
) -> String {
    let items = hits.value().map(Vec::as_slice).unwrap_or_default();
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| block(i + 1, item))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Title and the text after it. Corpus entries repeat the title as their
/// first line.
fn split_title(item: &VectorItem) -> (&str, &str) {
    let title = item.metadata.title.as_str();
    let body = item
        .text
        .strip_prefix(title)
        .map(str::trim_start)
        .filter(|b| !b.is_empty())
        .unwrap_or(&item.text);
    (title, body)
}

pub fn is_risk_question(question: &str) -> bool {
    let lower = question.to_lowercase();
    RISK_WORDS.iter().any(|w| lower.contains(w))
}

/// Summary of the risky clauses recorded when the contract was loaded.
pub fn risky_clause_summary(notes: &[RiskNote], excerpt_chars: usize) -> String {
    if notes.is_empty() {
        return NO_RISKY_CLAUSES.to_string();
    }

    let mut summary = format!("Found {} risky clauses:\n\n", notes.len());
    for (i, note) in notes.iter().enumerate() {
        summary.push_str(&format!("Risky Clause {}:\n", i + 1));
        summary.push_str(&format!("Type: {}\n", note.clause_type));
        match note.risk_score {
            Some(score) => summary.push_str(&format!("Risk Level: {} ({score}/10)\n", note.risk_level)),
            None => summary.push_str(&format!("Risk Level: {}\n", note.risk_level)),
        }
        if !note.why.is_empty() {
            summary.push_str(&format!("Why: {}\n", note.why));
        }
        if let Some(citation) = &note.citation {
            summary.push_str(&format!("Law: {citation}\n"));
        }
        if !note.clause_text.is_empty() {
            let excerpt = truncate_chars(&sanitize(&note.clause_text), excerpt_chars);
            summary.push_str(&format!("Text: \"{excerpt}\"\n"));
        }
        summary.push('\n');
    }
    summary.trim_end().to_string()
}

/// Best-guess type and level for a clause, from its keyword category.
/// Not authoritative.
pub fn heuristic_label(text: &str) -> (&'static str, RiskLevel) {
    let category = detect_category(text);
    let level = match category {
        Category::NonCompete | Category::PenaltyClause => RiskLevel::High,
        _ => RiskLevel::Medium,
    };
    (category.title(), level)
}

fn heuristic_risk_summary(clauses: &[&VectorItem], excerpt_chars: usize) -> String {
    let mut summary = String::from("Potential risky clauses found:\n\n");
    for (i, item) in clauses.iter().enumerate() {
        let (clause_type, level) = heuristic_label(&item.text);
        let excerpt = truncate_chars(&sanitize(&item.text), excerpt_chars);
        summary.push_str(&format!(
            "Risky Clause {}:\nType: {clause_type}\nRisk Level: {level}\nClause Text: \"{excerpt}\"\n\n",
            i + 1
        ));
    }
    summary.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sentinel_ai::{EmbedError, EmbeddingProvider};
    use sentinel_core::{Clause, CorpusKind, ProviderSettings};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn session(clauses: &[&str], risky: Vec<RiskNote>, embedder: &Embedder) -> SessionContext {
        let clauses = Clause::numbered(clauses.iter().copied());
        SessionContext::build(String::new(), clauses, risky, embedder).await
    }

    struct ConstantProvider;

    #[async_trait]
    impl EmbeddingProvider for ConstantProvider {
        fn model(&self) -> &str {
            "constant"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            // Non-compete text points one way, everything else the other.
            let v = if text.to_lowercase().contains("compet") { 1.0 } else { -1.0 };
            Ok(vec![v, 0.5, 0.5, 0.5])
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        fn model(&self) -> &str {
            "counting"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.5, 0.5, 0.5])
        }
    }

    fn live_embedder(provider: Arc<dyn EmbeddingProvider>) -> Embedder {
        let settings = ProviderSettings {
            dimension: 4,
            ..ProviderSettings::default()
        };
        Embedder::new(Some(provider), &settings)
    }

    #[tokio::test]
    async fn hash_corpora_fall_back_to_keywords() {
        let embedder = Embedder::hash_only(32);
        let kb = KnowledgeBase::load(None, None, &embedder).await.unwrap();
        let ctx = session(
            &["The notice period for resignation is three months.", "Wages are paid monthly."],
            vec![],
            &embedder,
        )
        .await;

        let limits = RetrievalLimits::default();
        let bundle = ContextBuilder::new(&embedder, &limits)
            .build("What is the notice period?", &kb, &ctx)
            .await;

        assert_eq!(bundle.provenance.contract.reason(), Some(&Degradation::HashEmbedding));
        assert!(bundle.contract_text.starts_with("Clause 1: The notice period"));
        assert_eq!(bundle.risky_summary, NO_RISKY_CLAUSES);
        assert!(!bundle.heuristic_risks);
    }

    #[tokio::test]
    async fn no_matches_render_sentinels() {
        let embedder = Embedder::hash_only(16);
        let kb = KnowledgeBase {
            statutes: Arc::new(Corpus::empty(CorpusKind::Statute)),
            references: Arc::new(Corpus::empty(CorpusKind::Reference)),
        };
        let ctx = session(&[], vec![], &embedder).await;
        let limits = RetrievalLimits::default();
        let bundle = ContextBuilder::new(&embedder, &limits).build("zzz", &kb, &ctx).await;

        assert_eq!(bundle.statute_text, NO_STATUTES);
        assert_eq!(bundle.reference_text, NO_REFERENCES);
        assert_eq!(bundle.contract_text, NO_CONTRACT_CLAUSES);
        assert_eq!(bundle.provenance.statutes.reason(), Some(&Degradation::EmptyCorpus));
    }

    #[tokio::test]
    async fn live_provider_ranks_semantically() {
        let embedder = live_embedder(Arc::new(ConstantProvider));
        let kb = KnowledgeBase::load(None, None, &embedder).await.unwrap();
        let ctx = session(
            &["Salary is paid on the first of each month.", "Employee shall not compete for a year."],
            vec![],
            &embedder,
        )
        .await;

        let limits = RetrievalLimits {
            contract_top_k: 1,
            ..RetrievalLimits::default()
        };
        let bundle = ContextBuilder::new(&embedder, &limits)
            .build("Can they stop me working for a competitor?", &kb, &ctx)
            .await;

        assert!(bundle.provenance.contract.is_ok());
        assert!(bundle.provenance.statutes.is_ok());
        assert_eq!(bundle.contract_text, "Clause 1: Employee shall not compete for a year.");
    }

    #[tokio::test]
    async fn each_corpus_fails_over_independently() {
        // Static corpora embedded before the provider was available.
        let kb = KnowledgeBase::load(None, None, &Embedder::hash_only(4)).await.unwrap();
        let embedder = live_embedder(Arc::new(ConstantProvider));
        let ctx = session(
            &["Salary is paid on the first of each month.", "Employee shall not compete for a year."],
            vec![],
            &embedder,
        )
        .await;

        let limits = RetrievalLimits {
            contract_top_k: 1,
            ..RetrievalLimits::default()
        };
        let bundle = ContextBuilder::new(&embedder, &limits)
            .build("Can they stop me working for a competitor?", &kb, &ctx)
            .await;

        assert_eq!(bundle.provenance.statutes.reason(), Some(&Degradation::HashEmbedding));
        assert_eq!(bundle.provenance.references.reason(), Some(&Degradation::HashEmbedding));
        assert!(bundle.provenance.contract.is_ok());
        assert_eq!(bundle.contract_text, "Clause 1: Employee shall not compete for a year.");
    }

    #[tokio::test]
    async fn question_is_embedded_once_per_build() {
        let provider = Arc::new(CountingProvider::default());
        let embedder = live_embedder(provider.clone());
        let kb = KnowledgeBase::load(None, None, &embedder).await.unwrap();
        let ctx = session(&["The notice period for resignation is three months."], vec![], &embedder).await;

        let before = provider.calls.load(Ordering::SeqCst);
        let limits = RetrievalLimits::default();
        let bundle = ContextBuilder::new(&embedder, &limits)
            .build("What is the notice period?", &kb, &ctx)
            .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst) - before, 1);
        assert!(bundle.provenance.statutes.is_ok());
        assert!(bundle.provenance.contract.is_ok());
    }

    #[tokio::test]
    async fn risk_question_without_session_risks_uses_heuristic() {
        let embedder = Embedder::hash_only(16);
        let kb = KnowledgeBase::load(None, None, &embedder).await.unwrap();
        let ctx = session(
            &["Any termination without notice attracts a penalty of one month's salary."],
            vec![],
            &embedder,
        )
        .await;
        let limits = RetrievalLimits::default();
        let bundle = ContextBuilder::new(&embedder, &limits)
            .build("Is the termination penalty a risk?", &kb, &ctx)
            .await;

        assert!(bundle.heuristic_risks);
        assert!(bundle.risky_summary.starts_with("Potential risky clauses found:"));
        assert!(bundle.risky_summary.contains("Type: Notice Period"));
    }

    #[tokio::test]
    async fn session_risks_take_priority_over_heuristic() {
        let embedder = Embedder::hash_only(16);
        let kb = KnowledgeBase::load(None, None, &embedder).await.unwrap();
        let note = RiskNote {
            clause_type: "Penalty Clause".into(),
            risk_level: RiskLevel::High,
            risk_score: Some(8),
            why: "Penalties must be a genuine pre-estimate of loss.".into(),
            citation: Some("Section 74, Indian Contract Act, 1872".into()),
            clause_text: "A penalty of Rs. 50,000 applies.".into(),
        };
        let ctx = session(&["A penalty of Rs. 50,000 applies on early exit."], vec![note], &embedder).await;
        let limits = RetrievalLimits::default();
        let bundle = ContextBuilder::new(&embedder, &limits)
            .build("Is the penalty a risk?", &kb, &ctx)
            .await;

        assert!(!bundle.heuristic_risks);
        assert!(bundle.risky_summary.starts_with("Found 1 risky clauses:"));
        assert!(bundle.risky_summary.contains("Risk Level: High (8/10)"));
        assert!(bundle.risky_summary.contains("Law: Section 74"));
    }

    #[test]
    fn long_clause_text_is_truncated_in_summary() {
        let note = RiskNote {
            clause_type: "Liability".into(),
            risk_level: RiskLevel::Medium,
            risk_score: None,
            why: String::new(),
            citation: None,
            clause_text: "x".repeat(500),
        };
        let summary = risky_clause_summary(&[note], 200);
        assert!(summary.contains(&format!("Text: \"{}...\"", "x".repeat(200))));
        assert!(summary.contains("Risk Level: Medium\n"));
    }

    #[test]
    fn risk_words_and_labels() {
        assert!(is_risk_question("Any PROBLEMS here?"));
        assert!(!is_risk_question("What is my salary?"));
        assert_eq!(heuristic_label("Employee shall not compete").0, "Non Compete");
        assert_eq!(heuristic_label("Employee shall not compete").1, RiskLevel::High);
        assert_eq!(
            heuristic_label("A penalty of Rs 10,000 applies."),
            ("Penalty Clause", RiskLevel::High)
        );
        assert_eq!(
            heuristic_label("All information is confidential."),
            ("Confidentiality", RiskLevel::Medium)
        );
        assert_eq!(heuristic_label("office hours").0, "General");
    }
}
