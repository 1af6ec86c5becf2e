//! Salary annexure analysis.
//!
//! Pulls CTC, basic pay, provident fund and the usual deductions out of an
//! annexure with regular expressions, estimates monthly in-hand pay, and
//! compares the PF rate and admin charges with common Indian practice. The
//! result answers seven fixed questions an employee asks before signing.
//!
//! Extraction is lexical. When CTC or basic pay cannot be found, the engine
//! may ask a completion provider for the numbers: [`extraction_prompt`]
//! builds that request and [`parse_extraction`] reads the reply.

use std::fmt;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// Statutory employee PF rate, percent of basic.
pub const STANDARD_PF_RATE: f64 = 12.0;
/// PF rates within this many points of the standard count as correct.
pub const PF_TOLERANCE: f64 = 0.5;
/// Monthly admin charges above this are flagged.
pub const ADMIN_CHARGE_LIMIT: f64 = 500.0;

const CTC_RANGE: (f64, f64) = (100_000.0, 10_000_000.0);
const BASIC_RANGE: (f64, f64) = (5_000.0, 500_000.0);
const PF_RANGE: (f64, f64) = (100.0, 50_000.0);
const LAKH: f64 = 100_000.0;
/// Characters of the document sent with an extraction request.
const EXTRACTION_EXCERPT_CHARS: usize = 2000;

// ── Extraction ──

/// Deductions other than employee PF, monthly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Deductions {
    pub professional_tax: Option<f64>,
    pub esi: Option<f64>,
    pub admin_charges: Option<f64>,
}

impl Deductions {
    pub fn total(&self) -> f64 {
        [self.professional_tax, self.esi, self.admin_charges]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// Raw figures read from an annexure. Zero means "not found".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalaryComponents {
    pub ctc_annual: f64,
    pub basic_monthly: f64,
    pub pf_employee: f64,
    pub pf_employer: f64,
    pub deductions: Deductions,
}

impl SalaryComponents {
    /// CTC or basic pay is missing, so the analysis will be thin.
    pub fn is_incomplete(&self) -> bool {
        self.ctc_annual == 0.0 || self.basic_monthly == 0.0
    }

    /// Fill figures that are still zero from `other`. Found figures are kept.
    pub fn fill_missing(&mut self, other: &SalaryComponents) {
        if self.ctc_annual == 0.0 && other.ctc_annual > 0.0 {
            self.ctc_annual = other.ctc_annual;
        }
        if self.basic_monthly == 0.0 && other.basic_monthly > 0.0 {
            self.basic_monthly = other.basic_monthly;
        }
        if self.pf_employee == 0.0 && other.pf_employee > 0.0 {
            self.pf_employee = other.pf_employee;
        }
    }
}

/// Read every component from annexure text.
pub fn extract_components(text: &str) -> SalaryComponents {
    let lower = text.to_lowercase();
    SalaryComponents {
        ctc_annual: extract_ctc(&lower),
        basic_monthly: first_in_range(basic_patterns(), &lower, BASIC_RANGE),
        pf_employee: first_in_range(pf_employee_patterns(), &lower, PF_RANGE),
        pf_employer: pf_employer_patterns()
            .iter()
            .find_map(|re| re.captures(&lower).and_then(|c| amount(&c)))
            .unwrap_or(0.0),
        deductions: Deductions {
            professional_tax: labelled_amount(&lower, 0),
            esi: labelled_amount(&lower, 1),
            admin_charges: labelled_amount(&lower, 2),
        },
    }
}

fn extract_ctc(lower: &str) -> f64 {
    for re in ctc_patterns() {
        let Some(caps) = re.captures(lower) else {
            continue;
        };
        let Some(mut value) = amount(&caps) else {
            continue;
        };
        // Figures quoted in lakhs, explicitly or by being implausibly small.
        if caps[0].contains("lakh") || value < 1000.0 {
            value *= LAKH;
        }
        if in_range(value, CTC_RANGE) {
            return value;
        }
    }

    // Largest bare figure that could be an annual CTC.
    bare_figure_regex()
        .find_iter(lower)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| in_range(*v, CTC_RANGE))
        .fold(0.0, f64::max)
}

/// First match of the first pattern that matches, kept only when in range.
fn first_in_range(patterns: &[Regex], lower: &str, range: (f64, f64)) -> f64 {
    patterns
        .iter()
        .filter_map(|re| re.captures(lower).and_then(|c| amount(&c)))
        .find(|v| in_range(*v, range))
        .unwrap_or(0.0)
}

/// Amount after the `which`th label of [`deduction_patterns`].
fn labelled_amount(lower: &str, which: usize) -> Option<f64> {
    deduction_patterns()
        .get(which)?
        .captures(lower)
        .and_then(|c| amount(&c))
}

fn amount(caps: &Captures<'_>) -> Option<f64> {
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&value)
}

/// Optional currency marker followed by a figure with optional grouping.
const AMOUNT: &str = r"(?:rs\.?|inr|₹)?\s*(\d+(?:,\d+)*(?:\.\d+)?)";

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| p.replace("{AMOUNT}", AMOUNT))
        .filter_map(|p| Regex::new(&p).ok())
        .collect()
}

fn ctc_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        compile(&[
            r"ctc[:\s]+{AMOUNT}\s*(?:lakhs?|l)?",
            r"cost to company[:\s]+{AMOUNT}",
            r"annual ctc[:\s]+{AMOUNT}",
            r"total ctc[:\s]+{AMOUNT}",
            r"(?:annual|yearly)\s+(?:package|compensation)[:\s]+{AMOUNT}",
            r"(?:rs\.?|inr|₹)\s*(\d+(?:,\d+)*(?:\.\d+)?)\s*(?:per|/)?\s*(?:annum|year|annually)",
            r"ctc\s*[|\t]\s*{AMOUNT}",
        ])
    })
}

fn basic_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        compile(&[
            r"basic[:\s]+{AMOUNT}",
            r"basic salary[:\s]+{AMOUNT}",
            r"basic pay[:\s]+{AMOUNT}",
            r"basic\s*[|\t]\s*{AMOUNT}",
        ])
    })
}

fn pf_employee_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        compile(&[
            r"employee(?:\s+pf|\s+provident fund)[:\s]+{AMOUNT}",
            r"pf\s+employee[:\s]+{AMOUNT}",
            r"employee contribution[:\s]+{AMOUNT}",
            r"pf\s+deduction[:\s]+{AMOUNT}",
            r"provident fund[:\s]+{AMOUNT}",
            r"(?:employee\s+)?pf\s*[|\t]\s*{AMOUNT}",
        ])
    })
}

fn pf_employer_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        compile(&[
            r"employer(?:\s+pf|\s+provident fund)[:\s]+{AMOUNT}",
            r"pf\s+employer[:\s]+{AMOUNT}",
            r"employer contribution[:\s]+{AMOUNT}",
        ])
    })
}

/// Professional tax, ESI, admin charges.
fn deduction_patterns() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        compile(&[
            r"professional tax[:\s]+{AMOUNT}",
            r"\besi[:\s]+{AMOUNT}",
            r"admin(?:istrative)?\s+(?:charges?|fee)[:\s]+{AMOUNT}",
        ])
    })
}

fn bare_figure_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{5,8}\b").unwrap())
}

// ── Provider-assisted extraction ──

/// Request for the three figures lexical extraction most often misses.
pub fn extraction_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(EXTRACTION_EXCERPT_CHARS).collect();
    format!(
        "Extract the following salary information from this document. Return ONLY numbers \
         (no currency symbols, no commas).\n\n\
         Document:\n{excerpt}\n\n\
         Extract:\n\
         1. Annual CTC (in rupees, full amount)\n\
         2. Monthly Basic Salary (in rupees)\n\
         3. Employee PF Contribution (monthly, in rupees)\n\n\
         Format your response EXACTLY like this:\n\
         CTC_ANNUAL: <number>\n\
         BASIC_SALARY: <number>\n\
         PF_EMPLOYEE: <number>\n\n\
         If you cannot find a value, write 0."
    )
}

/// Read a reply to [`extraction_prompt`]. Missing lines read as zero.
pub fn parse_extraction(reply: &str) -> SalaryComponents {
    let field = |re: &Regex| {
        re.captures(reply)
            .and_then(|c| c[1].parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let [ctc, basic, pf] = reply_regexes();
    SalaryComponents {
        ctc_annual: field(ctc),
        basic_monthly: field(basic),
        pf_employee: field(pf),
        ..SalaryComponents::default()
    }
}

fn reply_regexes() -> &'static [Regex; 3] {
    static RE: OnceLock<[Regex; 3]> = OnceLock::new();
    RE.get_or_init(|| {
        [
            Regex::new(r"CTC_ANNUAL:\s*(\d+)").unwrap(),
            Regex::new(r"BASIC_SALARY:\s*(\d+)").unwrap(),
            Regex::new(r"PF_EMPLOYEE:\s*(\d+)").unwrap(),
        ]
    })
}

// ── Analysis ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PfStatus {
    Correct,
    High,
    Low,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminChargeStatus {
    None,
    Acceptable,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryVerdict {
    Good,
    Questionable,
    Bad,
}

impl fmt::Display for SalaryVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Good => "GOOD",
            Self::Questionable => "QUESTIONABLE",
            Self::Bad => "BAD",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryBreakdown {
    pub ctc_annual: f64,
    pub ctc_monthly: f64,
    pub basic_salary: f64,
    pub pf_employee: f64,
    pub pf_employer: f64,
    pub other_deductions: Deductions,
    pub in_hand_monthly: f64,
    /// In-hand as a share of monthly CTC, one decimal place.
    pub in_hand_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardsComparison {
    /// Employee PF as a percentage of basic, two decimal places.
    pub pf_rate: f64,
    pub pf_status: PfStatus,
    pub admin_charges: f64,
    pub admin_charges_status: AdminChargeStatus,
}

/// Answers to the questions every annexure review covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyAnswers {
    pub pf_correct: String,
    pub deductions_comparison: String,
    pub ctc_vs_inhand: String,
    pub legally_wrong: String,
    pub ethically_questionable: String,
    pub company_should_do: String,
    pub employee_should_know: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryAnalysis {
    pub salary_breakdown: SalaryBreakdown,
    pub comparison_stats: StandardsComparison,
    pub key_answers: KeyAnswers,
    pub overall_verdict: SalaryVerdict,
}

impl SalaryAnalysis {
    /// Short statements loaded into a session so questions can be asked
    /// about the annexure.
    pub fn context_lines(&self) -> Vec<String> {
        let b = &self.salary_breakdown;
        vec![
            format!("CTC: {} per year", rupees(b.ctc_annual)),
            format!("In-hand: {} per month", rupees(b.in_hand_monthly)),
            format!("PF Employee: {} per month", rupees(b.pf_employee)),
            format!("PF Employer: {} per month", rupees(b.pf_employer)),
        ]
    }
}

/// Analyse extracted components.
pub fn analyze(components: &SalaryComponents) -> SalaryAnalysis {
    let ctc_monthly = components.ctc_annual / 12.0;
    let in_hand_monthly = in_hand(ctc_monthly, components);
    let in_hand_percentage = if ctc_monthly > 0.0 {
        round_to(in_hand_monthly / ctc_monthly * 100.0, 1)
    } else {
        0.0
    };

    let breakdown = SalaryBreakdown {
        ctc_annual: components.ctc_annual,
        ctc_monthly,
        basic_salary: components.basic_monthly,
        pf_employee: components.pf_employee,
        pf_employer: components.pf_employer,
        other_deductions: components.deductions,
        in_hand_monthly,
        in_hand_percentage,
    };
    let comparison = compare_with_standards(components);

    SalaryAnalysis {
        key_answers: key_answers(&breakdown, &comparison),
        overall_verdict: verdict(&comparison),
        salary_breakdown: breakdown,
        comparison_stats: comparison,
    }
}

/// [`extract_components`] then [`analyze`].
pub fn analyze_text(text: &str) -> SalaryAnalysis {
    analyze(&extract_components(text))
}

/// Monthly CTC less employee PF and other deductions. Zero without a CTC.
fn in_hand(ctc_monthly: f64, c: &SalaryComponents) -> f64 {
    if ctc_monthly == 0.0 {
        return 0.0;
    }
    round_to(ctc_monthly - c.pf_employee - c.deductions.total(), 2)
}

pub fn compare_with_standards(c: &SalaryComponents) -> StandardsComparison {
    let (pf_rate, pf_status) = if c.basic_monthly > 0.0 && c.pf_employee > 0.0 {
        let rate = c.pf_employee / c.basic_monthly * 100.0;
        let status = if (rate - STANDARD_PF_RATE).abs() < PF_TOLERANCE {
            PfStatus::Correct
        } else if rate > STANDARD_PF_RATE {
            PfStatus::High
        } else {
            PfStatus::Low
        };
        (round_to(rate, 2), status)
    } else {
        (0.0, PfStatus::Unknown)
    };

    let admin_charges = c.deductions.admin_charges.unwrap_or(0.0);
    let admin_charges_status = if admin_charges <= 0.0 {
        AdminChargeStatus::None
    } else if admin_charges > ADMIN_CHARGE_LIMIT {
        AdminChargeStatus::High
    } else {
        AdminChargeStatus::Acceptable
    };

    StandardsComparison {
        pf_rate,
        pf_status,
        admin_charges,
        admin_charges_status,
    }
}

/// One issue is questionable, two are bad.
pub fn verdict(comparison: &StandardsComparison) -> SalaryVerdict {
    let pf_issue = matches!(comparison.pf_status, PfStatus::High | PfStatus::Low);
    let admin_issue = comparison.admin_charges_status == AdminChargeStatus::High;
    match usize::from(pf_issue) + usize::from(admin_issue) {
        0 => SalaryVerdict::Good,
        1 => SalaryVerdict::Questionable,
        _ => SalaryVerdict::Bad,
    }
}

fn key_answers(b: &SalaryBreakdown, cmp: &StandardsComparison) -> KeyAnswers {
    let rate = cmp.pf_rate;
    let pf_correct = match cmp.pf_status {
        PfStatus::Correct => format!(
            "YES - Your PF is being cut at {rate}%, which is the standard rate in India \
             (12% employee + 12% employer)."
        ),
        PfStatus::High => format!(
            "NO - Your PF is being cut at {rate}%, which is HIGHER than the standard 12%. \
             This is unusual and may be incorrect."
        ),
        PfStatus::Low => format!(
            "PARTIAL - Your PF is being cut at {rate}%, which is LOWER than the standard 12%. \
             Check if this is intentional."
        ),
        PfStatus::Unknown => {
            "UNCLEAR - Could not determine PF rate from the document. Please verify with HR."
                .to_string()
        }
    };

    let total_deductions = b.pf_employee + b.other_deductions.total();
    let deduction_pct = if b.ctc_monthly > 0.0 {
        total_deductions / b.ctc_monthly * 100.0
    } else {
        0.0
    };
    let deductions_comparison = if deduction_pct < 15.0 {
        format!(
            "NORMAL - Total deductions are {deduction_pct:.1}% of CTC, which is within \
             standard range (12-20%)."
        )
    } else if deduction_pct < 25.0 {
        format!("SLIGHTLY HIGH - Total deductions are {deduction_pct:.1}% of CTC. Standard is 12-20%.")
    } else {
        format!(
            "HIGH - Total deductions are {deduction_pct:.1}% of CTC, which is higher than \
             normal (12-20%)."
        )
    };

    let in_hand_pct = if b.ctc_monthly > 0.0 {
        b.in_hand_monthly / b.ctc_monthly * 100.0
    } else {
        0.0
    };
    let assessment = if in_hand_pct >= 75.0 {
        "This is GOOD - you're getting a fair in-hand amount."
    } else if in_hand_pct >= 65.0 {
        "This is AVERAGE - typical for Indian companies."
    } else {
        "This is LOW - you're losing a lot to deductions and employer contributions."
    };
    let ctc_vs_inhand = format!(
        "You get approximately {in_hand_pct:.1}% of your CTC as in-hand salary ({} per month \
         from {} CTC). {assessment}",
        rupees(b.in_hand_monthly),
        rupees(b.ctc_monthly),
    );

    let legally_wrong = if cmp.pf_status == PfStatus::High {
        "POTENTIAL ISSUES: PF deduction exceeds statutory limit. Please consult with HR or a \
         labour law expert."
            .to_string()
    } else {
        "NO - Based on the document, everything appears to be legally compliant with Indian \
         labour laws."
            .to_string()
    };

    let admin = cmp.admin_charges;
    let mut ethical = Vec::new();
    if admin > ADMIN_CHARGE_LIMIT {
        ethical.push(format!("High admin charges ({}/month)", rupees(admin)));
    }
    if in_hand_pct < 65.0 {
        ethical.push("Low in-hand percentage compared to CTC".to_string());
    }
    let ethically_questionable = if ethical.is_empty() {
        "NO - The salary structure appears fair and transparent.".to_string()
    } else {
        format!(
            "YES - {}. While legal, this reduces your take-home significantly.",
            ethical.join(", ")
        )
    };

    let mut suggestions = Vec::new();
    if admin > ADMIN_CHARGE_LIMIT {
        suggestions.push("Reduce admin charges to ₹200-300/month (industry standard)");
    }
    if in_hand_pct < 70.0 {
        suggestions.push("Increase basic salary component to improve in-hand percentage");
    }
    let company_should_do = if suggestions.is_empty() {
        "The current structure is fair. No major changes needed.".to_string()
    } else {
        format!("Suggestions: {}.", suggestions.join("; "))
    };

    let mut points = vec![
        format!(
            "Your CTC is {}/year, but you'll receive ~{}/month in hand",
            rupees(b.ctc_annual),
            rupees(b.in_hand_monthly)
        ),
        "CTC includes employer's PF contribution, which you don't receive directly".to_string(),
        format!(
            "Total deductions: {}/month ({deduction_pct:.1}% of CTC)",
            rupees(total_deductions)
        ),
    ];
    if admin > 0.0 {
        points.push(format!("Admin charges of {}/month are being deducted", rupees(admin)));
    }
    let employee_should_know = format!("KEY POINTS: {}.", points.join(" | "));

    KeyAnswers {
        pf_correct,
        deductions_comparison,
        ctc_vs_inhand,
        legally_wrong,
        ethically_questionable,
        company_should_do,
        employee_should_know,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Whole rupees with thousands separators, e.g. `₹1,250,000`.
pub fn rupees(amount: f64) -> String {
    let whole = amount.round().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount.round() < 0.0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ANNEXURE: &str = "SALARY ANNEXURE\n\
        CTC: Rs. 6,00,000 per annum\n\
        Basic Salary: Rs. 25,000\n\
        Employee PF: Rs. 3,000\n\
        Employer PF: Rs. 3,000\n\
        Professional Tax: Rs. 200\n\
        Admin charges: Rs. 800";

    #[test]
    fn extracts_labelled_components() {
        let c = extract_components(ANNEXURE);
        assert_eq!(c.ctc_annual, 600_000.0);
        assert_eq!(c.basic_monthly, 25_000.0);
        assert_eq!(c.pf_employee, 3_000.0);
        assert_eq!(c.pf_employer, 3_000.0);
        assert_eq!(c.deductions.professional_tax, Some(200.0));
        assert_eq!(c.deductions.admin_charges, Some(800.0));
        assert_eq!(c.deductions.esi, None);
        assert!(!c.is_incomplete());
    }

    #[test]
    fn ctc_in_lakhs_is_scaled() {
        assert_eq!(extract_components("Total CTC: 7.5 lakhs").ctc_annual, 750_000.0);
        // Small figures are read as lakhs too.
        assert_eq!(extract_components("CTC: 12").ctc_annual, 1_200_000.0);
    }

    #[test]
    fn bare_figure_fallback_takes_largest_plausible() {
        let c = extract_components("Package 450000 with bonus 50000 and reference 99999999999");
        assert_eq!(c.ctc_annual, 450_000.0);
    }

    #[test]
    fn out_of_range_basic_is_ignored() {
        let c = extract_components("Basic: 900");
        assert_eq!(c.basic_monthly, 0.0);
        assert!(c.is_incomplete());
    }

    #[test]
    fn annexure_analysis() {
        let a = analyze_text(ANNEXURE);
        let b = &a.salary_breakdown;
        assert_eq!(b.ctc_monthly, 50_000.0);
        // 50,000 - 3,000 PF - 200 tax - 800 admin
        assert_eq!(b.in_hand_monthly, 46_000.0);
        assert_eq!(b.in_hand_percentage, 92.0);

        assert_eq!(a.comparison_stats.pf_rate, 12.0);
        assert_eq!(a.comparison_stats.pf_status, PfStatus::Correct);
        assert_eq!(a.comparison_stats.admin_charges_status, AdminChargeStatus::High);
        assert_eq!(a.overall_verdict, SalaryVerdict::Questionable);

        let answers = &a.key_answers;
        assert!(answers.pf_correct.starts_with("YES"));
        assert!(answers.deductions_comparison.starts_with("NORMAL - Total deductions are 8.0%"));
        assert!(answers.ctc_vs_inhand.contains("(₹46,000 per month from ₹50,000 CTC)"));
        assert!(answers.ethically_questionable.contains("High admin charges (₹800/month)"));
        assert!(answers.company_should_do.contains("Reduce admin charges"));
        assert!(answers.employee_should_know.contains("Your CTC is ₹600,000/year"));
    }

    #[test]
    fn pf_above_standard_is_flagged() {
        let c = SalaryComponents {
            ctc_annual: 600_000.0,
            basic_monthly: 20_000.0,
            pf_employee: 3_000.0,
            ..SalaryComponents::default()
        };
        let a = analyze(&c);
        assert_eq!(a.comparison_stats.pf_status, PfStatus::High);
        assert_eq!(a.comparison_stats.pf_rate, 15.0);
        assert!(a.key_answers.legally_wrong.starts_with("POTENTIAL ISSUES"));
        assert_eq!(a.overall_verdict, SalaryVerdict::Questionable);
    }

    #[test]
    fn two_issues_make_a_bad_verdict() {
        let cmp = StandardsComparison {
            pf_rate: 8.0,
            pf_status: PfStatus::Low,
            admin_charges: 900.0,
            admin_charges_status: AdminChargeStatus::High,
        };
        assert_eq!(verdict(&cmp), SalaryVerdict::Bad);
    }

    #[test]
    fn empty_document_is_unknown_not_failed() {
        let a = analyze_text("Nothing useful here.");
        assert_eq!(a.salary_breakdown.in_hand_monthly, 0.0);
        assert_eq!(a.salary_breakdown.in_hand_percentage, 0.0);
        assert_eq!(a.comparison_stats.pf_status, PfStatus::Unknown);
        assert_eq!(a.overall_verdict, SalaryVerdict::Good);
        assert!(a.key_answers.pf_correct.starts_with("UNCLEAR"));
    }

    #[test]
    fn extraction_reply_fills_only_missing_figures() {
        let reply = "CTC_ANNUAL: 840000\nBASIC_SALARY: 35000\nPF_EMPLOYEE: 0";
        let assisted = parse_extraction(reply);
        assert_eq!(assisted.ctc_annual, 840_000.0);
        assert_eq!(assisted.basic_monthly, 35_000.0);

        let mut found = SalaryComponents {
            ctc_annual: 600_000.0,
            pf_employee: 1_800.0,
            ..SalaryComponents::default()
        };
        found.fill_missing(&assisted);
        assert_eq!(found.ctc_annual, 600_000.0);
        assert_eq!(found.basic_monthly, 35_000.0);
        assert_eq!(found.pf_employee, 1_800.0);
    }

    #[test]
    fn extraction_prompt_bounds_the_document() {
        let prompt = extraction_prompt(&"x".repeat(5000));
        assert!(prompt.contains("CTC_ANNUAL: <number>"));
        assert!(!prompt.contains(&"x".repeat(2001)));
    }

    #[test]
    fn context_lines_for_session() {
        let lines = analyze_text(ANNEXURE).context_lines();
        assert_eq!(lines[0], "CTC: ₹600,000 per year");
        assert_eq!(lines[1], "In-hand: ₹46,000 per month");
    }

    #[test]
    fn rupee_grouping() {
        assert_eq!(rupees(0.0), "₹0");
        assert_eq!(rupees(999.4), "₹999");
        assert_eq!(rupees(1_250_000.0), "₹1,250,000");
    }

    proptest! {
        #[test]
        fn in_hand_plus_deductions_is_monthly_ctc(
            ctc in 100_000u32..10_000_000,
            pf in 0u32..20_000,
            tax in 0u32..2_500,
        ) {
            let c = SalaryComponents {
                ctc_annual: f64::from(ctc),
                pf_employee: f64::from(pf),
                deductions: Deductions { professional_tax: Some(f64::from(tax)), ..Deductions::default() },
                ..SalaryComponents::default()
            };
            let b = analyze(&c).salary_breakdown;
            let reconstructed = b.in_hand_monthly + b.pf_employee + b.other_deductions.total();
            prop_assert!((reconstructed - b.ctc_monthly).abs() < 0.01);
            prop_assert!(b.in_hand_percentage <= 100.0);
        }

        #[test]
        fn statutory_pf_is_always_correct(basic in 5_000u32..500_000) {
            let c = SalaryComponents {
                ctc_annual: 1_200_000.0,
                basic_monthly: f64::from(basic),
                pf_employee: f64::from(basic) * 0.12,
                ..SalaryComponents::default()
            };
            let a = analyze(&c);
            prop_assert_eq!(a.comparison_stats.pf_status, PfStatus::Correct);
            prop_assert_ne!(a.overall_verdict, SalaryVerdict::Bad);
        }
    }
}
