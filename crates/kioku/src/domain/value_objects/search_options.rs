//! SearchOptions - Filters and limits for fact search

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::MemoryFact;
use crate::domain::services::scoring::age_days;

pub const DEFAULT_LIMIT: usize = 8;
pub const DEFAULT_MIN_SCORE: f32 = 0.25;
pub const DEFAULT_SINCE_DAYS: f64 = 120.0;

/// Search options for fact queries
///
/// Each set filter matches when it shares at least one value with the
/// fact's corresponding set; an empty set disables that filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub participants: BTreeSet<String>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Maximum fact age in days; `None` disables the cutoff
    #[serde(default = "default_since_days")]
    pub since_days: Option<f64>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Applied to the final (recency-weighted) score
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_since_days() -> Option<f64> {
    Some(DEFAULT_SINCE_DAYS)
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_min_score() -> f32 {
    DEFAULT_MIN_SCORE
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            participants: BTreeSet::new(),
            topics: BTreeSet::new(),
            tags: BTreeSet::new(),
            since_days: default_since_days(),
            limit: default_limit(),
            min_score: default_min_score(),
        }
    }
}

impl SearchOptions {
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_since_days(mut self, since_days: Option<f64>) -> Self {
        self.since_days = since_days;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Whether a fact passes the cutoff and all set filters
    pub fn matches(&self, fact: &MemoryFact, now: DateTime<Utc>) -> bool {
        if let Some(since_days) = self.since_days {
            if age_days(fact.meeting_date, now) > since_days {
                return false;
            }
        }

        intersects(&self.participants, &fact.participants)
            && intersects(&self.topics, &fact.topics)
            && intersects(&self.tags, &fact.tags)
    }
}

fn intersects(wanted: &BTreeSet<String>, present: &BTreeSet<String>) -> bool {
    wanted.is_empty() || !wanted.is_disjoint(present)
}
