//! MemoryFact - A statement remembered from a meeting
//!
//! Pure domain entity without infrastructure dependencies.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Default `fact_type` tag
pub const DEFAULT_FACT_TYPE: &str = "fact";

/// MemoryFact - An embedded statement tied to a meeting
///
/// Immutable once created; the store hands out clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryFact {
    /// Unique identifier, namespaced under the meeting
    pub fact_id: String,
    /// The meeting this fact was extracted from
    pub meeting_id: String,
    /// The statement itself
    pub fact_text: String,
    /// Open tag (fact, decision, action, ...)
    pub fact_type: String,
    /// When the meeting took place; drives recency scoring
    pub meeting_date: DateTime<Utc>,
    #[serde(default)]
    pub participants: BTreeSet<String>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Utterance index in the originating transcript
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_turn: Option<u32>,
    /// Opaque caller metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Vector embedding of `fact_text`
    pub embedding: Vec<f32>,
    /// When this fact was inserted
    pub created_at: DateTime<Utc>,
}

impl MemoryFact {
    /// Build a fact from validated input and its embedding
    pub fn from_new(input: NewFact, embedding: Vec<f32>, now: DateTime<Utc>) -> Self {
        Self {
            fact_id: Self::generate_id(&input.meeting_id),
            meeting_id: input.meeting_id,
            fact_text: input.fact_text,
            fact_type: input.fact_type,
            meeting_date: input.meeting_date.unwrap_or(now),
            participants: input.participants,
            topics: input.topics,
            tags: input.tags,
            source_turn: input.source_turn,
            metadata: input.metadata,
            embedding,
            created_at: now,
        }
    }

    /// Generate a fact id of the form `mtg::<meeting_id>::<uuid>`
    pub fn generate_id(meeting_id: &str) -> String {
        format!("mtg::{}::{}", meeting_id, uuid::Uuid::new_v4())
    }
}

/// Input for adding a fact to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFact {
    pub meeting_id: String,
    pub fact_text: String,
    #[serde(default = "default_fact_type")]
    pub fact_type: String,
    /// Defaults to the insertion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub participants: BTreeSet<String>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_turn: Option<u32>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

fn default_fact_type() -> String {
    DEFAULT_FACT_TYPE.to_string()
}

impl NewFact {
    pub fn new(meeting_id: impl Into<String>, fact_text: impl Into<String>) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            fact_text: fact_text.into(),
            fact_type: default_fact_type(),
            meeting_date: None,
            participants: BTreeSet::new(),
            topics: BTreeSet::new(),
            tags: BTreeSet::new(),
            source_turn: None,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_type(mut self, fact_type: impl Into<String>) -> Self {
        self.fact_type = fact_type.into();
        self
    }

    pub fn with_meeting_date(mut self, meeting_date: DateTime<Utc>) -> Self {
        self.meeting_date = Some(meeting_date);
        self
    }

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

    pub fn with_source_turn(mut self, turn: u32) -> Self {
        self.source_turn = Some(turn);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Check required fields; runs before any embedding call
    pub fn validate(&self) -> Result<(), DomainError> {
        DomainError::require_text("meeting_id", &self.meeting_id)?;
        DomainError::require_text("fact_text", &self.fact_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_defaults() {
        let input = NewFact::new("mtg_001", "Bob owns the API cutoff");
        assert_eq!(input.fact_type, "fact");
        assert!(input.meeting_date.is_none());
        assert!(input.topics.is_empty());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert!(NewFact::new("", "text").validate().is_err());
        assert!(NewFact::new("mtg_001", "  ").validate().is_err());
    }

    #[test]
    fn test_from_new_fills_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap();
        let input = NewFact::new("mtg_001", "Ship it")
            .with_topics(["api", "api", "cutoff"])
            .with_source_turn(4);
        let fact = MemoryFact::from_new(input, vec![1.0, 0.0], now);

        assert!(fact.fact_id.starts_with("mtg::mtg_001::"));
        assert_eq!(fact.meeting_date, now);
        assert_eq!(fact.created_at, now);
        assert_eq!(fact.topics.len(), 2);
        assert_eq!(fact.source_turn, Some(4));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(
            MemoryFact::generate_id("mtg_001"),
            MemoryFact::generate_id("mtg_001")
        );
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let input: NewFact = serde_json::from_str(
            r#"{"meeting_id": "mtg_002", "fact_text": "Mobile beta ships April 10", "topics": ["mobile"]}"#,
        )
        .unwrap();
        assert_eq!(input.fact_type, "fact");
        assert!(input.topics.contains("mobile"));
        assert!(input.metadata.is_empty());
    }
}
