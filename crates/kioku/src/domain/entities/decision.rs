//! RecallDecision - What to do with one utterance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SearchHit;
use crate::domain::value_objects::RecallReason;

/// Decision result with the evidence it was based on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallDecision {
    /// Show the top hit passively
    pub should_surface: bool,
    /// Announce the top hit proactively
    pub should_interject: bool,
    pub reason: RecallReason,
    /// Ranked hits considered, best first
    pub hits: Vec<SearchHit>,
    pub decided_at: DateTime<Utc>,
}

impl RecallDecision {
    pub fn no_hits(decided_at: DateTime<Utc>) -> Self {
        Self {
            should_surface: false,
            should_interject: false,
            reason: RecallReason::NoHits,
            hits: Vec::new(),
            decided_at,
        }
    }

    /// Best-ranked hit, if any
    pub fn top_hit(&self) -> Option<&SearchHit> {
        self.hits.first()
    }
}
