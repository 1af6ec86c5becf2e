//! The engine: configuration, corpora, sessions, and the operations that
//! tie them together.

use std::sync::Arc;
use std::time::Duration;

use sentinel_ai::salary::{self, SalaryAnalysis};
use sentinel_ai::{ClauseClassifier, Completer, ComplianceAggregator, Embedder, RiskFinding};
use sentinel_core::{Clause, ComplianceReport, RiskNote, SentinelConfig};
use sentinel_store::{CorpusStats, KnowledgeBase, SessionContext, SessionId, SessionStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::intake::{self, ScanReport};
use crate::retrieval::{ContextBuilder, ContextBundle};

pub struct Engine {
    config: SentinelConfig,
    embedder: Embedder,
    knowledge: KnowledgeBase,
    sessions: SessionStore,
    classifier: ClauseClassifier,
    aggregator: ComplianceAggregator,
    completer: Option<Arc<dyn Completer>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("embedder", &self.embedder)
            .field("sessions", &self.sessions.len())
            .field("completer", &self.completer.is_some())
            .finish()
    }
}

impl Engine {
    pub fn new(config: SentinelConfig, embedder: Embedder, knowledge: KnowledgeBase) -> Self {
        Self {
            classifier: ClauseClassifier::new(&config.classifier),
            aggregator: ComplianceAggregator::new(config.scoring.clone()),
            config,
            embedder,
            knowledge,
            sessions: SessionStore::default(),
            completer: None,
        }
    }

    /// Engine over the built-in corpora with hash embeddings and no
    /// completion provider.
    pub async fn offline(config: SentinelConfig) -> Result<Self, EngineError> {
        let embedder = Embedder::hash_only(config.provider.dimension);
        let knowledge = KnowledgeBase::load(None, None, &embedder).await?;
        Ok(Self::new(config, embedder, knowledge))
    }

    pub fn with_completer(mut self, completer: Arc<dyn Completer>) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(crate) fn completer(&self) -> Option<&Arc<dyn Completer>> {
        self.completer.as_ref()
    }

    pub(crate) fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.config.provider.timeout_secs)
    }

    pub fn corpus_stats(&self) -> Vec<CorpusStats> {
        self.knowledge.stats(self.embedder.dim())
    }

    /// Classify every clause and aggregate against the full document text.
    pub fn validate_document(&self, clauses: &[Clause], document_text: &str) -> ComplianceReport {
        let verdicts = self.classifier.classify_all(clauses);
        let report = self.aggregator.aggregate(verdicts, document_text);
        info!(
            clauses = clauses.len(),
            score = report.compliance_score,
            tier = %report.risk_tier,
            missing = report.missing_clauses.len(),
            "contract validated"
        );
        report
    }

    /// [`validate_document`](Self::validate_document) with the clauses
    /// themselves as the document text.
    pub fn validate_contract(&self, clauses: &[Clause]) -> ComplianceReport {
        let text = clauses
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        self.validate_document(clauses, &text)
    }

    pub fn analyze_clause(&self, text: &str) -> Option<RiskFinding> {
        sentinel_ai::analyze_clause(text)
    }

    /// Rule-based risk scan. With a completer, each explanation is also
    /// reworded in plain language.
    pub async fn scan(&self, clauses: &[Clause]) -> ScanReport {
        let mut report = intake::scan(clauses);
        let reworded = match self.completer() {
            Some(completer) if !report.findings.is_empty() => {
                intake::explain_findings(&mut report.findings, completer.as_ref(), self.completion_timeout())
                    .await
            }
            _ => 0,
        };
        info!(
            findings = report.findings.len(),
            reworded,
            score = report.overview.score,
            level = %report.overview.level,
            "risk scan complete"
        );
        report
    }

    pub fn open_session(&self) -> SessionId {
        self.sessions.open()
    }

    /// Embed the clauses and replace the session's context.
    pub async fn set_contract_context(
        &self,
        session: SessionId,
        text: String,
        clauses: Vec<Clause>,
        risky: Vec<RiskNote>,
    ) {
        let context = SessionContext::build(text, clauses, risky, &self.embedder).await;
        self.sessions.set_context(session, context);
    }

    /// Accept a raw document, validate it, and load it into the session.
    ///
    /// Risky notes come from the risk scan; when it finds nothing, from the
    /// flagged compliance verdicts.
    pub async fn load_contract(
        &self,
        session: SessionId,
        raw_text: &str,
    ) -> Result<LoadedContract, EngineError> {
        let document = intake::prepare(raw_text, &self.config.classifier)?;
        let report = self.validate_document(&document.clauses, &document.text);
        let scan = self.scan(&document.clauses).await;

        let mut risky: Vec<RiskNote> = scan.findings.iter().map(RiskFinding::to_note).collect();
        if risky.is_empty() {
            risky = report.flagged().filter_map(RiskNote::from_verdict).collect();
        }

        self.set_contract_context(session, document.text, document.clauses, risky)
            .await;
        Ok(LoadedContract { report, scan })
    }

    /// Analyse a salary annexure and load its key figures into the session.
    ///
    /// When CTC or basic pay cannot be read and a completer is available, the
    /// completer is asked for the missing figures. Its failure leaves the
    /// lexical result in place.
    pub async fn analyze_salary(
        &self,
        session: SessionId,
        raw_text: &str,
    ) -> Result<SalaryReport, EngineError> {
        let text = intake::accept_text(raw_text, &self.config.classifier)?;
        let mut components = salary::extract_components(&text);

        let mut assisted = false;
        if let Some(completer) = self.completer().filter(|_| components.is_incomplete()) {
            let prompt = salary::extraction_prompt(&text);
            match tokio::time::timeout(self.completion_timeout(), completer.complete(&prompt)).await {
                Ok(Ok(reply)) => {
                    let before = components;
                    components.fill_missing(&salary::parse_extraction(&reply));
                    assisted = components != before;
                }
                Ok(Err(e)) => warn!(signal = e.signal(), "salary extraction assist failed"),
                Err(_) => warn!(signal = "timeout", "salary extraction assist timed out"),
            }
        }

        let analysis = salary::analyze(&components);
        info!(
            session = %session,
            ctc = analysis.salary_breakdown.ctc_annual,
            verdict = %analysis.overall_verdict,
            assisted,
            "salary annexure analysed"
        );

        let clauses = Clause::numbered(analysis.context_lines());
        self.set_contract_context(session, text, clauses, Vec::new()).await;
        Ok(SalaryReport { analysis, assisted })
    }

    pub fn clear_contract(&self, session: SessionId) -> bool {
        self.sessions.clear_context(session)
    }

    pub fn has_contract(&self, session: SessionId) -> bool {
        self.sessions.has_contract(session)
    }

    /// Context bundle for `question`, or [`EngineError::NoContract`] when
    /// the session has nothing loaded.
    pub async fn retrieve_context(
        &self,
        session: SessionId,
        question: &str,
    ) -> Result<ContextBundle, EngineError> {
        let context = self.sessions.context(session)?;
        let bundle = ContextBuilder::new(&self.embedder, &self.config.retrieval)
            .build(question, &self.knowledge, &context)
            .await;
        Ok(bundle)
    }
}

/// Result of [`Engine::load_contract`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadedContract {
    pub report: ComplianceReport,
    pub scan: ScanReport,
}

/// Result of [`Engine::analyze_salary`].
#[derive(Debug, Clone, Serialize)]
pub struct SalaryReport {
    pub analysis: SalaryAnalysis,
    /// Some figures came from the completion provider.
    pub assisted: bool,
}
