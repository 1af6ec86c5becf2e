//! Paragraph and numbering heuristic that turns document text into clauses.

use std::sync::OnceLock;

use regex::Regex;

use crate::clause::Clause;

/// Clauses this short or shorter are headers or noise.
pub const DEFAULT_MIN_CLAUSE_CHARS: usize = 20;

/// Split document text into numbered clauses.
///
/// Line endings are normalised to `\n` first. Paragraphs are separated by
/// blank lines. Inside a paragraph a line that
/// starts with a numbering marker (`1.`, `(a)`, `(2)`, `A.`) opens a new
/// clause; other lines continue the current one. Clauses of `min_chars`
/// characters or fewer are dropped before numbering.
pub fn split_into_clauses(text: &str, min_chars: usize) -> Vec<Clause> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut raw = Vec::new();

    for paragraph in text.split("\n\n") {
        let mut current = String::new();
        for line in paragraph.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if numbering_regex().is_match(line) {
                if !current.is_empty() {
                    raw.push(std::mem::take(&mut current));
                }
                current.push_str(line);
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(line);
            }
        }
        if !current.is_empty() {
            raw.push(current);
        }
    }

    Clause::numbered(
        raw.into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| c.chars().count() > min_chars),
    )
}

fn numbering_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+\.|\([a-z]\)|\(\d+\)|[A-Z]\.)").unwrap())
}
