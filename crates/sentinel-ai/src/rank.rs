//! Shared top-k selection for lexical and semantic ranking.

use std::cmp::Ordering;

/// A corpus entry with the score it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a, T> {
    pub item: &'a T,
    pub score: f32,
}

/// Sort descending by score and keep the first `top_k`.
///
/// The sort is stable, so equal scores keep their input order.
pub fn top_k<'a, T>(mut hits: Vec<Hit<'a, T>>, top_k: usize) -> Vec<Hit<'a, T>> {
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);
    hits
}
