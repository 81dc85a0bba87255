//! SearchHit - A fact scored against one query

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MemoryFact;

/// Scored search result; produced per query and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub fact_id: String,
    pub meeting_id: String,
    pub fact_type: String,
    pub fact_text: String,
    pub participants: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub meeting_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_turn: Option<u32>,
    /// Raw cosine similarity
    pub score: f32,
    /// Decay factor in (0, 1]
    pub recency_boost: f32,
    /// Ranking score
    pub final_score: f32,
}

impl SearchHit {
    pub fn from_fact(fact: &MemoryFact, score: f32, recency_boost: f32, final_score: f32) -> Self {
        Self {
            fact_id: fact.fact_id.clone(),
            meeting_id: fact.meeting_id.clone(),
            fact_type: fact.fact_type.clone(),
            fact_text: fact.fact_text.clone(),
            participants: fact.participants.clone(),
            topics: fact.topics.clone(),
            tags: fact.tags.clone(),
            meeting_date: fact.meeting_date,
            source_turn: fact.source_turn,
            score,
            recency_boost,
            final_score,
        }
    }
}
