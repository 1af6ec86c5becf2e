//! End-to-end scenarios across intake, sessions, retrieval, and answering.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sentinel_ai::{Completer, CompletionError};
use sentinel_core::rules::compliant_template;
use sentinel_core::{Category, Clause, Degradation, RiskTier, SentinelConfig, Status};
use sentinel_engine::retrieval::{NO_CONTRACT_CLAUSES, NO_RISKY_CLAUSES};
use sentinel_ai::SalaryVerdict;
use sentinel_ai::salary::PfStatus;
use sentinel_engine::{Engine, EngineError, InputRejection};

const CONTRACT: &str = "\
1. The Employee shall serve a notice period of three months before resignation.

2. Salary shall be paid on the last working day of every month.

3. The Employee shall not compete with the Company for one year after termination.

4. The governing law of this Agreement is the law of India and the courts at Pune shall \
have jurisdiction. Any dispute shall be referred to arbitration.";

const ANNEXURE: &str = "\
SALARY ANNEXURE
CTC: Rs. 6,00,000 per annum
Basic Salary: Rs. 25,000
Employee PF: Rs. 3,000
Employer PF: Rs. 3,000
Professional Tax: Rs. 200
Admin charges: Rs. 800";

async fn engine() -> Engine {
    Engine::offline(SentinelConfig::default()).await.unwrap()
}

struct CannedCompleter(&'static str);

#[async_trait]
impl Completer for CannedCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Ok(self.0.to_string())
    }
}

struct QuotaCompleter {
    calls: AtomicUsize,
}

#[async_trait]
impl Completer for QuotaCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CompletionError::KeysExhausted(2))
    }
}

struct StalledCompleter;

#[async_trait]
impl Completer for StalledCompleter {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".into())
    }
}

#[tokio::test]
async fn non_compete_and_wages_validate_to_fifty_high() {
    let engine = engine().await;
    let clauses = Clause::numbered([
        "Employee shall not compete with Company within 6 months after termination.",
        "Wages shall be paid monthly.",
    ]);

    let report = engine.validate_contract(&clauses);

    assert_eq!(report.clause_verdicts.len(), 2);
    let first = &report.clause_verdicts[0];
    assert_eq!(first.category, Category::NonCompete);
    assert_eq!(first.status, Status::Invalid);
    assert!(first.citation.as_deref().unwrap_or_default().contains("Section 27"));
    let second = &report.clause_verdicts[1];
    assert_eq!(second.category, Category::SalaryPayment);
    assert_eq!(second.status, Status::Valid);
    assert_eq!(report.compliance_score, 50);
    assert_eq!(report.risk_tier, RiskTier::High);
}

#[tokio::test]
async fn question_without_contract_is_no_contract() {
    let engine = engine().await;
    let session = engine.open_session();

    let err = engine
        .retrieve_context(session, "Is there a notice period?")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NoContract(id) if id == session));

    let err = engine.ask(session, "Is there a notice period?").await.unwrap_err();
    assert!(matches!(err, EngineError::NoContract(_)));
}

#[tokio::test]
async fn missing_required_clauses_carry_templates() {
    let engine = engine().await;
    let clauses = Clause::numbered([
        "The Employee shall keep all client information confidential.",
        "Salary shall be paid on the first working day of every month.",
    ]);
    let text = "The Employee shall keep all client information confidential.\n\n\
                Salary shall be paid on the first working day of every month.";

    let report = engine.validate_document(&clauses, text);

    let keys: Vec<&str> = report.missing_clauses.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["governing_law", "jurisdiction", "dispute_resolution", "termination_clause"]
    );
    for missing in &report.missing_clauses {
        assert!(missing.required);
        assert_eq!(missing.template, compliant_template(&missing.key));
    }
    assert!(report.summary.ends_with("4 important clauses are missing."));
}

#[tokio::test]
async fn load_then_ask_falls_back_without_provider() {
    let engine = engine().await;
    let session = engine.open_session();

    let loaded = engine.load_contract(session, CONTRACT).await.unwrap();
    assert_eq!(loaded.report.clause_verdicts.len(), 4);
    assert!(loaded.report.missing_clauses.is_empty());
    assert!(!loaded.scan.findings.is_empty());
    assert!(engine.has_contract(session));

    let answer = engine.ask(session, "Is there a notice period?").await.unwrap();
    assert_eq!(answer.answer.reason(), Some(&Degradation::ProviderUnavailable));
    assert!(answer.text().starts_with("I apologize"));
    assert!(answer.text().contains("notice period of three months"));
    assert_ne!(answer.context.contract_text, NO_CONTRACT_CLAUSES);
    // The scan found the non-compete clause, so the summary is not the
    // heuristic one.
    assert!(answer.context.risky_summary.starts_with("Found 1 risky clauses:"));
}

#[tokio::test]
async fn completion_answer_is_used_when_available() {
    let engine = engine()
        .await
        .with_completer(Arc::new(CannedCompleter("  Yes, the notice period is three months.  ")));
    let session = engine.open_session();
    engine.load_contract(session, CONTRACT).await.unwrap();

    let answer = engine.ask(session, "Is there a notice period?").await.unwrap();
    assert!(answer.answer.is_ok());
    assert_eq!(answer.text(), "Yes, the notice period is three months.");
}

#[tokio::test]
async fn completion_failure_becomes_fallback() {
    let completer = Arc::new(QuotaCompleter {
        calls: AtomicUsize::new(0),
    });
    let engine = engine().await.with_completer(completer.clone());
    let session = engine.open_session();
    let loaded = engine.load_contract(session, CONTRACT).await.unwrap();
    // The non-compete finding asked for a rewording and kept its own text.
    assert_eq!(completer.calls.load(Ordering::SeqCst), 1);
    assert!(loaded.scan.findings[0].plain_explanation.is_none());

    let answer = engine.ask(session, "What is my salary date?").await.unwrap();
    assert_eq!(completer.calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        answer.answer.reason(),
        Some(&Degradation::ProviderError("keys_exhausted".into()))
    );
    assert!(answer.text().contains("not legal advice"));
}

#[tokio::test]
async fn stalled_completion_times_out() {
    let mut config = SentinelConfig::default();
    config.provider.timeout_secs = 1;
    let engine = Engine::offline(config)
        .await
        .unwrap()
        .with_completer(Arc::new(StalledCompleter));
    let session = engine.open_session();
    engine.load_contract(session, CONTRACT).await.unwrap();

    let answer = engine.ask(session, "Is there a notice period?").await.unwrap();
    assert_eq!(answer.answer.reason(), Some(&Degradation::Timeout));
}

#[tokio::test]
async fn sessions_do_not_share_contracts() {
    let engine = engine().await;
    let a = engine.open_session();
    let b = engine.open_session();
    engine.load_contract(a, CONTRACT).await.unwrap();

    assert!(engine.retrieve_context(a, "notice").await.is_ok());
    assert!(matches!(
        engine.retrieve_context(b, "notice").await,
        Err(EngineError::NoContract(_))
    ));

    assert!(engine.clear_contract(a));
    assert!(!engine.has_contract(a));
}

#[tokio::test]
async fn reload_replaces_previous_contract() {
    let engine = engine().await;
    let session = engine.open_session();
    engine.load_contract(session, CONTRACT).await.unwrap();
    engine
        .load_contract(
            session,
            "1. The office is located in Bengaluru and opens at nine in the morning.\n\
             2. Employees may work from home on Fridays with prior approval.",
        )
        .await
        .unwrap();

    let bundle = engine.retrieve_context(session, "Is there a notice period?").await.unwrap();
    assert!(!bundle.contract_text.contains("three months"));
    assert_eq!(bundle.risky_summary, NO_RISKY_CLAUSES);
}

#[tokio::test]
async fn short_upload_is_rejected() {
    let engine = engine().await;
    let session = engine.open_session();
    let err = engine.load_contract(session, "Too short.").await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InputRejected(InputRejection::TooShort { len: 10, min: 50 })
    ));
    assert!(!engine.has_contract(session));
}

#[tokio::test]
async fn reworded_explanations_reach_the_risky_summary() {
    let engine = engine().await.with_completer(Arc::new(CannedCompleter(
        "Put simply, nobody can stop you from working in your field after you leave.",
    )));
    let session = engine.open_session();
    let loaded = engine.load_contract(session, CONTRACT).await.unwrap();

    let finding = &loaded.scan.findings[0];
    assert_eq!(finding.risk_score, 9);
    assert!(finding.plain_explanation.is_some());

    let bundle = engine.retrieve_context(session, "Is anything risky?").await.unwrap();
    assert!(bundle.risky_summary.contains("Why: Put simply, nobody can stop you"));
}

#[tokio::test]
async fn salary_annexure_is_analysed_and_loaded() {
    let engine = engine().await;
    let session = engine.open_session();
    let report = engine.analyze_salary(session, ANNEXURE).await.unwrap();

    assert!(!report.assisted);
    let analysis = &report.analysis;
    assert_eq!(analysis.salary_breakdown.in_hand_monthly, 46_000.0);
    assert_eq!(analysis.comparison_stats.pf_status, PfStatus::Correct);
    assert_eq!(analysis.overall_verdict, SalaryVerdict::Questionable);

    assert!(engine.has_contract(session));
    let answer = engine.ask(session, "What is my in-hand pay?").await.unwrap();
    assert_eq!(answer.answer.reason(), Some(&Degradation::ProviderUnavailable));
}

#[tokio::test]
async fn salary_figures_missing_from_text_come_from_the_provider() {
    let engine = engine().await.with_completer(Arc::new(CannedCompleter(
        "CTC_ANNUAL: 900000\nBASIC_SALARY: 30000\nPF_EMPLOYEE: 3600",
    )));
    let session = engine.open_session();
    let report = engine
        .analyze_salary(
            session,
            "Your compensation is described in the attached offer letter for this role.",
        )
        .await
        .unwrap();

    assert!(report.assisted);
    let b = &report.analysis.salary_breakdown;
    assert_eq!(b.ctc_annual, 900_000.0);
    assert_eq!(b.basic_salary, 30_000.0);
    assert_eq!(report.analysis.comparison_stats.pf_status, PfStatus::Correct);
}

#[tokio::test]
async fn salary_assist_failure_keeps_lexical_figures() {
    let engine = engine().await.with_completer(Arc::new(QuotaCompleter {
        calls: AtomicUsize::new(0),
    }));
    let session = engine.open_session();
    let report = engine
        .analyze_salary(
            session,
            "Your compensation is described in the attached offer letter for this role.",
        )
        .await
        .unwrap();

    assert!(!report.assisted);
    assert_eq!(report.analysis.salary_breakdown.ctc_annual, 0.0);
    assert_eq!(report.analysis.comparison_stats.pf_status, PfStatus::Unknown);
}

#[tokio::test]
async fn short_salary_upload_is_rejected() {
    let engine = engine().await;
    let session = engine.open_session();
    let err = engine.analyze_salary(session, "CTC: 6 lakhs").await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InputRejected(InputRejection::TooShort { len: 12, min: 50 })
    ));
}
