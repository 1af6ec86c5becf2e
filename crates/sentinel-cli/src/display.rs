//! Plain-text rendering of reports, scans, answers, salary reviews, and
//! corpus stats.

use sentinel_ai::salary::rupees;
use sentinel_core::{ComplianceReport, Outcome, Status};
use sentinel_engine::{Answer, ContextBundle, SalaryReport, ScanReport};
use sentinel_store::CorpusStats;

const LABEL_WIDTH: usize = 18;

// ── Public API ──

pub fn print_report(report: &ComplianceReport) {
    println!("=== Compliance report ===");
    println!("{}", report.summary);
    println!();
    field("score", format!("{}/100", report.compliance_score));
    field("risk tier", report.risk_tier);
    println!();

    println!("Clauses");
    for verdict in &report.clause_verdicts {
        println!(
            "  {} [{}] {} ({})",
            marker(verdict.status),
            verdict.status,
            verdict.clause_ref,
            verdict.category.title()
        );
        println!("      {}", verdict.display_text);
        println!("      {}", verdict.rationale);
        if let Some(citation) = &verdict.citation {
            println!("      law: {citation}");
        }
        if let Some(fix) = &verdict.remediation {
            println!("      suggest: {fix}");
        }
    }
    println!();

    if !report.missing_clauses.is_empty() {
        println!("Missing clauses");
        for missing in &report.missing_clauses {
            println!("  - {}: {}", missing.title, missing.rationale);
            println!("      template: {}", missing.template);
        }
        println!();
    }
}

pub fn print_scan(scan: &ScanReport) {
    println!("=== Risk scan ===");
    field("findings", scan.findings.len());
    field("risk score", format!("{:.1}/10", scan.overview.score));
    field("risk level", scan.overview.level);
    println!();

    for (i, finding) in scan.findings.iter().enumerate() {
        println!(
            "{}. {} ({}, {}/10)",
            i + 1,
            finding.clause_type,
            finding.risk_level,
            finding.risk_score
        );
        println!("   {}", finding.clause_text);
        println!("   why: {}", finding.explanation());
        println!("   law: {}", finding.citation);
        for action in &finding.user_actions {
            println!("   - {action}");
        }
        println!("   safer: {}", finding.safer_rewrite);
        println!();
    }
}

pub fn print_salary(report: &SalaryReport) {
    let a = &report.analysis;
    let b = &a.salary_breakdown;
    println!("=== Salary review ===");
    field("verdict", a.overall_verdict);
    field("ctc (annual)", rupees(b.ctc_annual));
    field("ctc (monthly)", rupees(b.ctc_monthly));
    field("basic", rupees(b.basic_salary));
    field("pf employee", rupees(b.pf_employee));
    field("pf employer", rupees(b.pf_employer));
    field("other deductions", rupees(b.other_deductions.total()));
    field("in hand", format!("{} ({}%)", rupees(b.in_hand_monthly), b.in_hand_percentage));
    field("pf rate", format!("{}%", a.comparison_stats.pf_rate));
    if report.assisted {
        eprintln!("  (some figures read by the completion provider)");
    }
    println!();

    let k = &a.key_answers;
    for (question, answer) in [
        ("Is PF cut correctly?", &k.pf_correct),
        ("Deductions vs standard", &k.deductions_comparison),
        ("CTC vs in-hand", &k.ctc_vs_inhand),
        ("Legally wrong?", &k.legally_wrong),
        ("Ethically questionable?", &k.ethically_questionable),
        ("What the company should do", &k.company_should_do),
        ("Before you sign", &k.employee_should_know),
    ] {
        println!("{question}");
        println!("   {answer}");
    }
    println!();
}

pub fn print_answer(answer: &Answer) {
    println!("Q: {}", answer.question);
    println!();
    println!("{}", answer.text());
    println!();
    if let Some(reason) = answer.answer.reason() {
        eprintln!("  (fallback answer: {reason})");
    }
    print_sources(&answer.context);
    println!("{}", answer.disclaimer);
}

pub fn print_bundle(bundle: &ContextBundle) {
    print_sources(bundle);
    println!("=== Contract ===\n{}\n", bundle.contract_text);
    println!("=== Statutes ===\n{}\n", bundle.statute_text);
    println!("=== References ===\n{}\n", bundle.reference_text);
    println!("=== Risky clauses ===\n{}\n", bundle.risky_summary);
}

pub fn print_corpus_stats(stats: &[CorpusStats]) {
    println!("{:<18} {:>6}  {:>5}  embedding", "corpus", "items", "dim");
    for s in stats {
        let source = s
            .embedding_source
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".into());
        println!("{:<18} {:>6}  {:>5}  {}", s.kind.as_str(), s.items, s.dim, source);
    }
}

// ── Helpers ──

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<LABEL_WIDTH$} {}", label, value);
}

fn marker(status: Status) -> &'static str {
    match status {
        Status::Valid => "ok",
        Status::Risky => "!!",
        Status::Invalid => "XX",
    }
}

fn provenance(outcome: &Outcome<usize>) -> String {
    match outcome {
        Outcome::Ok { value } => format!("{value} semantic"),
        Outcome::Degraded { value, reason } => format!("{value} keyword ({reason})"),
        Outcome::Failed { reason } => format!("failed ({reason})"),
    }
}

fn print_sources(bundle: &ContextBundle) {
    let p = &bundle.provenance;
    eprintln!(
        "  retrieval: contract {}, statutes {}, references {}",
        provenance(&p.contract),
        provenance(&p.statutes),
        provenance(&p.references),
    );
    if bundle.heuristic_risks {
        eprintln!("  risky clauses guessed from retrieved text");
    }
}
