//! Text helpers shared by the classifier, retrieval and prompt layers.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Marker appended to text cut by [`truncate_chars`].
pub const CONTINUATION: &str = "...";

/// Clean text before it goes into a prompt.
///
/// Drops characters outside the Basic Multilingual Plane (emoji and other
/// symbols), removes `=` runs and dash rules of 3+ characters, collapses 3+
/// newlines to a blank line, and trims.
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let bmp: String = text.chars().filter(|c| (*c as u32) < 0x10000).collect();
    let cleaned = rule_regex().replace_all(&bmp, "");
    let collapsed = blank_run_regex().replace_all(&cleaned, "\n\n");
    collapsed.trim().to_string()
}

/// Cut `text` to at most `max_chars` characters, appending [`CONTINUATION`]
/// when anything was removed. Never splits a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{CONTINUATION}", &text[..byte_idx]),
    }
}

/// Lowercased whitespace-delimited tokens.
pub fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// All unsigned integers appearing in `text`, in order.
pub fn integers(text: &str) -> Vec<u64> {
    integer_regex()
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

fn rule_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"=+|-{3,}").unwrap())
}

fn blank_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}
