//! Contract intake: accepting a document, splitting it, and the two
//! rule-based passes run over its clauses.

use std::path::Path;
use std::time::Duration;

use futures::future::join_all;
use sentinel_ai::{Completer, RiskFinding, RiskOverview, analyze_clause, overall_risk};
use sentinel_core::text::sanitize;
use sentinel_core::{ClassifierSettings, Clause, split_into_clauses};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::InputRejection;

/// Document formats read directly. Anything else needs text extraction
/// before it reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Markdown,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, InputRejection> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            None | Some("txt") | Some("text") => Ok(Self::Text),
            Some("md") | Some("markdown") => Ok(Self::Markdown),
            Some(other) => Err(InputRejection::UnsupportedKind(other.to_string())),
        }
    }
}

/// A document accepted for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub clauses: Vec<Clause>,
}

/// Rewordings this short are discarded.
const MIN_EXPLANATION_CHARS: usize = 20;

/// Sanitize and check the minimum length.
pub fn accept_text(raw: &str, settings: &ClassifierSettings) -> Result<String, InputRejection> {
    let text = sanitize(raw);
    let len = text.chars().count();
    if len < settings.min_document_chars {
        return Err(InputRejection::TooShort {
            len,
            min: settings.min_document_chars,
        });
    }
    Ok(text)
}

/// Sanitize, check length, and split into clauses.
///
/// The minimum length applies to the sanitized text, so rules and symbol
/// padding do not count towards it.
pub fn prepare(raw: &str, settings: &ClassifierSettings) -> Result<Document, InputRejection> {
    let text = accept_text(raw, settings)?;
    let clauses = split_into_clauses(&text, settings.min_clause_chars);
    if clauses.is_empty() {
        return Err(InputRejection::NoClauses);
    }
    debug!(chars = text.len(), clauses = clauses.len(), "document prepared");
    Ok(Document { text, clauses })
}

/// Findings of the rule-based risk scan and their overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub findings: Vec<RiskFinding>,
    pub overview: RiskOverview,
}

pub fn scan(clauses: &[Clause]) -> ScanReport {
    let findings: Vec<RiskFinding> = clauses
        .iter()
        .filter_map(|c| analyze_clause(&c.text))
        .collect();
    let overview = overall_risk(&findings);
    ScanReport { findings, overview }
}

/// Ask the completer to reword each finding's explanation.
///
/// Risk levels, scores and citations are never touched. A failed, timed out
/// or too-short reply leaves the detector's own explanation in place.
/// Returns how many findings were reworded.
pub async fn explain_findings(
    findings: &mut [RiskFinding],
    completer: &dyn Completer,
    timeout: Duration,
) -> usize {
    let replies = join_all(findings.iter().map(|f| {
        let prompt = f.explanation_prompt();
        async move { tokio::time::timeout(timeout, completer.complete(&prompt)).await }
    }))
    .await;

    let mut reworded = 0;
    for (finding, reply) in findings.iter_mut().zip(replies) {
        match reply {
            Ok(Ok(text)) if text.trim().chars().count() > MIN_EXPLANATION_CHARS => {
                finding.plain_explanation = Some(text.trim().to_string());
                reworded += 1;
            }
            Ok(Ok(_)) => {
                debug!(clause_type = %finding.clause_type, "rewording too short, keeping original");
            }
            Ok(Err(e)) => {
                warn!(clause_type = %finding.clause_type, signal = e.signal(), "rewording failed, keeping original");
            }
            Err(_) => {
                warn!(clause_type = %finding.clause_type, signal = "timeout", "rewording timed out, keeping original");
            }
        }
    }
    reworded
}
