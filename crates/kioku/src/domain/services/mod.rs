//! Domain Services
//!
//! Stateless domain logic shared by the application layer.

pub mod scoring;

pub use scoring::{age_days, cosine_similarity, final_score, recency_boost};
