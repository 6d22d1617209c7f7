use std::cmp::Ordering;

use crate::models::{CandidateMovie, RankedResult};

/// Result cap for free-text semantic search
pub const FREE_TEXT_LIMIT: usize = 100;
/// Result cap for platform-scoped search
pub const PLATFORM_LIMIT: usize = 50;
/// Result cap for unranked fallback responses
pub const FALLBACK_LIMIT: usize = 50;

/// Cosine similarity of two vectors
///
/// Returns exactly 0.0 when either vector is empty, the lengths differ, or
/// either norm is zero. Accumulates in f64 and clamps to `[-1, 1]` so that
/// rounding never leaves the range.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Orders scored candidates and keeps the top `limit`
///
/// Sort keys: similarity descending, then vote average descending. The sort
/// is stable, so remaining ties keep aggregation order.
pub fn rank(scored: Vec<(CandidateMovie, f64)>, limit: usize) -> Vec<RankedResult> {
    let mut scored = scored;
    scored.sort_by(|(movie_a, sim_a), (movie_b, sim_b)| {
        descending(*sim_a, *sim_b)
            .then_with(|| descending(movie_a.vote_average, movie_b.vote_average))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(movie, similarity)| RankedResult::scored(movie, similarity))
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
