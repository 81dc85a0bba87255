//! Recall Orchestrator - Real-time surface/interject decisions
//!
//! Turns each utterance into one store query and applies two thresholds
//! plus an interjection cooldown. The only state carried across calls is
//! the instant of the last granted interjection.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::FactStore;
use crate::config::RecallConfig;
use crate::domain::{DomainError, RecallDecision, RecallReason, SearchOptions};

/// One utterance plus optional store filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UtteranceInput {
    pub utterance: String,
    #[serde(default)]
    pub participants: BTreeSet<String>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl UtteranceInput {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            ..Self::default()
        }
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
}

/// Threshold and cooldown based recall policy over a fact store
pub struct RecallOrchestrator {
    store: Arc<FactStore>,
    config: RecallConfig,
    last_interject_at: Mutex<Option<DateTime<Utc>>>,
}

impl RecallOrchestrator {
    pub fn new(store: impl Into<Arc<FactStore>>, config: RecallConfig) -> Self {
        if config.interject_threshold < config.surface_threshold {
            warn!(
                surface_threshold = config.surface_threshold,
                interject_threshold = config.interject_threshold,
                "Interject threshold is below surface threshold; interjections may fire without surfacing"
            );
        }

        Self {
            store: store.into(),
            config,
            last_interject_at: Mutex::new(None),
        }
    }

    pub fn with_defaults(store: impl Into<Arc<FactStore>>) -> Self {
        Self::new(store, RecallConfig::default())
    }

    pub fn store(&self) -> &Arc<FactStore> {
        &self.store
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    /// Instant of the last granted interjection
    pub async fn last_interject_at(&self) -> Option<DateTime<Utc>> {
        *self.last_interject_at.lock().await
    }

    /// Decide on an utterance as of now
    pub async fn process_utterance(
        &self,
        input: UtteranceInput,
    ) -> Result<RecallDecision, DomainError> {
        self.process_utterance_at(input, Utc::now()).await
    }

    /// Decide on an utterance as of `now`
    pub async fn process_utterance_at(
        &self,
        input: UtteranceInput,
        now: DateTime<Utc>,
    ) -> Result<RecallDecision, DomainError> {
        DomainError::require_text("utterance", &input.utterance)?;

        let options = SearchOptions {
            participants: input.participants,
            topics: input.topics,
            tags: input.tags,
            limit: self.config.max_hits,
            min_score: self.config.min_threshold(),
            ..SearchOptions::default()
        };

        let hits = self
            .store
            .search_at(&input.utterance, &options, now)
            .await?;

        let top_score = match hits.first() {
            Some(top) => top.final_score,
            None => {
                debug!(reason = %RecallReason::NoHits, "Recall decision");
                return Ok(RecallDecision::no_hits(now));
            }
        };

        let should_surface = top_score >= self.config.surface_threshold;

        // Check and set under one lock so concurrent utterances cannot both interject
        let (should_interject, reason) = {
            let mut last = self.last_interject_at.lock().await;
            let on_cooldown = match *last {
                Some(at) => self.within_cooldown(at, now),
                None => false,
            };

            if top_score >= self.config.interject_threshold && !on_cooldown {
                *last = Some(now);
                (true, RecallReason::Interject)
            } else if on_cooldown {
                (false, RecallReason::Cooldown)
            } else {
                (false, RecallReason::SurfaceOnly)
            }
        };

        debug!(
            top_score,
            should_surface,
            should_interject,
            reason = %reason,
            hits = hits.len(),
            "Recall decision"
        );

        Ok(RecallDecision {
            should_surface,
            should_interject,
            reason,
            hits,
            decided_at: now,
        })
    }

    fn within_cooldown(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let elapsed_secs = (now - last).num_milliseconds() as f64 / 1000.0;
        elapsed_secs < self.config.cooldown_seconds
    }
}

impl Default for RecallOrchestrator {
    fn default() -> Self {
        Self::with_defaults(FactStore::offline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::ScriptedEmbedder;
    use crate::config::StoreConfig;
    use crate::domain::NewFact;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap()
    }

    /// Fact vector [1, 0]; queries score exactly their first component
    async fn orchestrator(config: RecallConfig) -> (RecallOrchestrator, Arc<ScriptedEmbedder>) {
        let embedder = Arc::new(
            ScriptedEmbedder::new()
                .with("fact", vec![1.0, 0.0])
                .with("strong", vec![0.9, 0.435_889_9])
                .with("middling", vec![0.45, 0.893_028_6])
                .with("faint", vec![0.1, 0.994_987_4]),
        );
        let store = FactStore::new(embedder.clone(), &StoreConfig::default());
        store
            .add_fact(
                NewFact::new("mtg_001", "fact")
                    .with_meeting_date(t0())
                    .with_topics(["api"]),
            )
            .await
            .unwrap();
        (RecallOrchestrator::new(store, config), embedder)
    }

    fn cooldown_20() -> RecallConfig {
        RecallConfig {
            cooldown_seconds: 20.0,
            ..RecallConfig::default()
        }
    }

    #[tokio::test]
    async fn test_no_hits() {
        let (orch, _) = orchestrator(RecallConfig::default()).await;
        let decision = orch
            .process_utterance_at(UtteranceInput::new("faint"), t0())
            .await
            .unwrap();

        assert_eq!(decision.reason, RecallReason::NoHits);
        assert!(!decision.should_surface && !decision.should_interject);
        assert!(decision.hits.is_empty());
        assert_eq!(decision.decided_at, t0());
    }

    #[tokio::test]
    async fn test_surface_only() {
        let (orch, _) = orchestrator(RecallConfig::default()).await;
        let decision = orch
            .process_utterance_at(UtteranceInput::new("middling"), t0())
            .await
            .unwrap();

        assert_eq!(decision.reason, RecallReason::SurfaceOnly);
        assert!(decision.should_surface);
        assert!(!decision.should_interject);
        assert!(orch.last_interject_at().await.is_none());
    }

    #[tokio::test]
    async fn test_cooldown_window() {
        let (orch, _) = orchestrator(cooldown_20()).await;

        let a = orch
            .process_utterance_at(UtteranceInput::new("strong"), t0())
            .await
            .unwrap();
        assert!(a.should_interject);
        assert_eq!(a.reason, RecallReason::Interject);
        assert_eq!(orch.last_interject_at().await, Some(t0()));

        let b = orch
            .process_utterance_at(UtteranceInput::new("strong"), t0() + Duration::seconds(5))
            .await
            .unwrap();
        assert!(!b.should_interject);
        assert!(b.should_surface);
        assert_eq!(b.reason, RecallReason::Cooldown);
        assert_eq!(orch.last_interject_at().await, Some(t0()));

        let c_time = t0() + Duration::seconds(25);
        let c = orch
            .process_utterance_at(UtteranceInput::new("strong"), c_time)
            .await
            .unwrap();
        assert!(c.should_interject);
        assert_eq!(orch.last_interject_at().await, Some(c_time));
    }

    #[tokio::test]
    async fn test_surfacing_ignores_cooldown() {
        let (orch, _) = orchestrator(cooldown_20()).await;
        orch.process_utterance_at(UtteranceInput::new("strong"), t0())
            .await
            .unwrap();

        let decision = orch
            .process_utterance_at(UtteranceInput::new("middling"), t0() + Duration::seconds(1))
            .await
            .unwrap();
        assert!(decision.should_surface);
        assert!(!decision.should_interject);
        assert_eq!(decision.reason, RecallReason::Cooldown);
    }

    #[tokio::test]
    async fn test_filters_pass_through() {
        let (orch, _) = orchestrator(RecallConfig::default()).await;
        let decision = orch
            .process_utterance_at(UtteranceInput::new("strong").with_topics(["mobile"]), t0())
            .await
            .unwrap();
        assert_eq!(decision.reason, RecallReason::NoHits);
    }

    #[tokio::test]
    async fn test_inverted_thresholds_are_kept() {
        let config = RecallConfig {
            surface_threshold: 0.95,
            interject_threshold: 0.5,
            ..RecallConfig::default()
        };
        let (orch, _) = orchestrator(config).await;
        let decision = orch
            .process_utterance_at(UtteranceInput::new("strong"), t0())
            .await
            .unwrap();

        assert!(!decision.should_surface);
        assert!(decision.should_interject);
    }

    #[tokio::test]
    async fn test_blank_utterance_rejected_without_query() {
        let (orch, embedder) = orchestrator(RecallConfig::default()).await;
        let calls_before = embedder.calls();

        let result = orch
            .process_utterance_at(UtteranceInput::new(""), t0())
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(embedder.calls(), calls_before);
    }

    #[tokio::test]
    async fn test_embedder_failure_propagates_without_state_change() {
        let (orch, _) = orchestrator(RecallConfig::default()).await;
        let result = orch
            .process_utterance_at(UtteranceInput::new("unknown utterance"), t0())
            .await;

        assert!(matches!(result, Err(DomainError::ExternalService(_))));
        assert!(orch.last_interject_at().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_utterances_interject_once() {
        let (orch, _) = orchestrator(cooldown_20()).await;
        let orch = Arc::new(orch);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let orch = orch.clone();
                tokio::spawn(async move {
                    orch.process_utterance_at(
                        UtteranceInput::new("strong"),
                        t0() + Duration::milliseconds(i),
                    )
                    .await
                    .unwrap()
                })
            })
            .collect();

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().should_interject {
                granted += 1;
            }
        }
        assert_eq!(granted, 1);
    }
}
