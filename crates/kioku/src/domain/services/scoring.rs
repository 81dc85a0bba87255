//! Scoring - Similarity and recency math for fact ranking
//!
//! Recency is a dampener, not a primary signal: the combined score always
//! lies in `[0.5 * raw, raw]`.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days between `then` and `now` (negative for future dates)
pub fn age_days(then: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - then).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Cosine similarity over the shared prefix of two vectors.
///
/// Vectors of different length are compared up to the shorter one.
/// Returns 0 when either side has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Exponential decay `2^(-age / half_life)`, age clamped at zero.
///
/// Falls back to the neutral 1.0 when the result is not a finite number.
pub fn recency_boost(meeting_date: DateTime<Utc>, now: DateTime<Utc>, half_life_days: f64) -> f32 {
    let age = age_days(meeting_date, now).max(0.0);
    let boost = (-age / half_life_days).exp2();
    if boost.is_finite() {
        boost as f32
    } else {
        1.0
    }
}

/// Combine raw similarity with recency: `raw * (0.5 + 0.5 * boost)`
pub fn final_score(raw: f32, boost: f32) -> f32 {
    raw * (0.5 + 0.5 * boost)
}
