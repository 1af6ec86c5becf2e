//! Question answering over a loaded contract.

use sentinel_core::text::truncate_chars;
use sentinel_core::{Degradation, Outcome};
use sentinel_store::SessionId;
use serde::Serialize;
use tracing::{error, info};

use crate::engine::Engine;
use crate::error::EngineError;
use crate::prompt::build_prompt;
use crate::retrieval::{ContextBundle, NO_CONTRACT_CLAUSES};

pub const DISCLAIMER: &str = "This is not legal advice. This tool provides educational \
information only. Consult a qualified lawyer for legal matters.";

const FALLBACK_CLAUSE_CHARS: usize = 300;

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub question: String,
    /// `Degraded` when the canned fallback answer was used.
    pub answer: Outcome<String>,
    pub context: ContextBundle,
    pub disclaimer: &'static str,
}

impl Answer {
    pub fn text(&self) -> &str {
        self.answer.value().map(String::as_str).unwrap_or_default()
    }
}

impl Engine {
    /// Answer `question` against the session's contract.
    ///
    /// Completion failures never surface as errors; they produce the
    /// fallback answer. Only a missing contract is an error.
    pub async fn ask(&self, session: SessionId, question: &str) -> Result<Answer, EngineError> {
        let context = self.retrieve_context(session, question).await?;
        let prompt = build_prompt(question, &context);

        let answer = match self.completer() {
            None => Outcome::degraded(
                fallback_answer(question, &context),
                Degradation::ProviderUnavailable,
            ),
            Some(completer) => {
                let timeout = self.completion_timeout();
                match tokio::time::timeout(timeout, completer.complete(&prompt)).await {
                    Ok(Ok(text)) if !text.trim().is_empty() => Outcome::ok(text.trim().to_string()),
                    Ok(Ok(_)) => {
                        error!(session = %session, signal = "empty", "completion returned no text");
                        Outcome::degraded(
                            fallback_answer(question, &context),
                            Degradation::ProviderError("empty completion".into()),
                        )
                    }
                    Ok(Err(e)) => {
                        error!(session = %session, signal = e.signal(), error = %e, "completion failed");
                        Outcome::degraded(
                            fallback_answer(question, &context),
                            Degradation::ProviderError(e.signal().to_string()),
                        )
                    }
                    Err(_) => {
                        error!(session = %session, signal = "timeout", timeout_secs = timeout.as_secs(), "completion timed out");
                        Outcome::degraded(fallback_answer(question, &context), Degradation::Timeout)
                    }
                }
            }
        };

        info!(session = %session, fallback = answer.is_degraded(), "question answered");
        Ok(Answer {
            question: question.to_string(),
            answer,
            context,
            disclaimer: DISCLAIMER,
        })
    }
}

/// Deterministic answer used when completion is unavailable or fails.
pub fn fallback_answer(question: &str, context: &ContextBundle) -> String {
    let mut parts = vec![
        "I apologize, but I'm having trouble generating a detailed response right now.".to_string(),
        String::new(),
    ];

    let clauses = context.contract_text.as_str();
    if !clauses.is_empty() && clauses != NO_CONTRACT_CLAUSES {
        parts.push(format!("Based on your question \"{question}\", here's what I found:"));
        parts.push(String::new());
        let first = match clauses.split_once("\n\n") {
            Some((first, _)) => first.to_string(),
            None => truncate_chars(clauses, FALLBACK_CLAUSE_CHARS),
        };
        parts.push(first.replacen("Clause 1: ", "", 1).trim().to_string());
    } else {
        parts.push(format!(
            "I couldn't find specific information about \"{question}\" in your contract."
        ));
    }

    parts.push(String::new());
    parts.push(
        "Please note: This is not legal advice. Consult a qualified lawyer for legal matters."
            .to_string(),
    );
    parts.join("\n")
}
