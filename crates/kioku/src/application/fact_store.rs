//! Fact Store Application Service
//!
//! Owns the fact collection, embeds facts on insert and answers filtered,
//! recency-weighted similarity queries with a full scan.
//!
//! The embedder is always called outside the collection lock; the lock only
//! guards the final insertion and the scan.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::adapters::HashEmbedder;
use crate::config::{KiokuConfig, StoreConfig};
use crate::domain::services::scoring::{cosine_similarity, final_score, recency_boost};
use crate::domain::{DomainError, MemoryFact, NewFact, SearchHit, SearchOptions};
use crate::ports::Embedder;

const MIN_HALF_LIFE_DAYS: f64 = 1.0;

/// Facts in insertion order plus an id index
#[derive(Default)]
struct FactTable {
    facts: Vec<MemoryFact>,
    index: HashMap<String, usize>,
}

impl FactTable {
    fn insert(&mut self, mut fact: MemoryFact) -> String {
        while self.index.contains_key(&fact.fact_id) {
            fact.fact_id = MemoryFact::generate_id(&fact.meeting_id);
        }
        let fact_id = fact.fact_id.clone();
        self.index.insert(fact_id.clone(), self.facts.len());
        self.facts.push(fact);
        fact_id
    }
}

/// In-memory store of embedded meeting facts
pub struct FactStore {
    embedder: Arc<dyn Embedder>,
    recency_half_life_days: f64,
    table: RwLock<FactTable>,
}

impl FactStore {
    /// Create a store backed by the given embedder
    pub fn new(embedder: Arc<dyn Embedder>, config: &StoreConfig) -> Self {
        Self {
            embedder,
            recency_half_life_days: config.recency_half_life_days.max(MIN_HALF_LIFE_DAYS),
            table: RwLock::new(FactTable::default()),
        }
    }

    /// Create a store backed by the hash embedder of `config.hash_embedding_dim`
    pub fn with_hash_embedder(config: &StoreConfig) -> Result<Self, DomainError> {
        let embedder = HashEmbedder::new(config.hash_embedding_dim)?;
        Ok(Self::new(Arc::new(embedder), config))
    }

    /// Offline store with default settings
    pub fn offline() -> Self {
        Self::new(Arc::new(HashEmbedder::default()), &StoreConfig::default())
    }

    /// Create a store with the embedder selected by config
    pub fn from_config(config: &KiokuConfig) -> Result<Self, DomainError> {
        let embedder = crate::adapters::build_embedder(&config.embedder, &config.store)?;
        Ok(Self::new(embedder, &config.store))
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    pub fn recency_half_life_days(&self) -> f64 {
        self.recency_half_life_days
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.facts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.table.read().await.facts.is_empty()
    }

    /// Look up a fact by id
    pub async fn get(&self, fact_id: &str) -> Option<MemoryFact> {
        let table = self.table.read().await;
        table
            .index
            .get(fact_id)
            .and_then(|&pos| table.facts.get(pos))
            .cloned()
    }

    /// Look up a fact by id, failing with `NotFound` when absent
    pub async fn get_required(&self, fact_id: &str) -> Result<MemoryFact, DomainError> {
        self.get(fact_id)
            .await
            .ok_or_else(|| DomainError::not_found("MemoryFact", fact_id))
    }

    /// All facts of one meeting, in insertion order
    pub async fn facts_for_meeting(&self, meeting_id: &str) -> Vec<MemoryFact> {
        self.table
            .read()
            .await
            .facts
            .iter()
            .filter(|f| f.meeting_id == meeting_id)
            .cloned()
            .collect()
    }

    /// Embed and insert a fact, returning its new id
    pub async fn add_fact(&self, input: NewFact) -> Result<String, DomainError> {
        input.validate()?;

        let embedding = self.embedder.embed(&input.fact_text).await?;
        let fact = MemoryFact::from_new(input, embedding, Utc::now());

        let fact_id = self.table.write().await.insert(fact);

        info!(fact_id = %fact_id, embedder = self.embedder.name(), "Stored meeting fact");

        Ok(fact_id)
    }

    /// Insert facts one by one, in order.
    ///
    /// All inputs are validated first. Embedding calls are sequential; if one
    /// fails the error is returned and facts inserted so far stay in the store.
    pub async fn bulk_add(&self, inputs: Vec<NewFact>) -> Result<Vec<String>, DomainError> {
        for (i, input) in inputs.iter().enumerate() {
            input
                .validate()
                .map_err(|e| DomainError::Validation(format!("fact #{i}: {e}")))?;
        }

        let mut ids = Vec::with_capacity(inputs.len());
        for input in inputs {
            ids.push(self.add_fact(input).await?);
        }
        Ok(ids)
    }

    /// Search facts as of now
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, DomainError> {
        self.search_at(query, options, Utc::now()).await
    }

    /// Search facts as of `now`.
    ///
    /// An empty store returns immediately, before the query is validated or
    /// embedded.
    pub async fn search_at(
        &self,
        query: &str,
        options: &SearchOptions,
        now: DateTime<Utc>,
    ) -> Result<Vec<SearchHit>, DomainError> {
        if self.is_empty().await {
            return Ok(Vec::new());
        }

        DomainError::require_text("query", query)?;

        let query_vector = self.embedder.embed(query).await?;

        let (scanned, mut hits) = {
            let table = self.table.read().await;
            let hits: Vec<SearchHit> = table
                .facts
                .iter()
                .filter(|fact| options.matches(fact, now))
                .filter_map(|fact| self.score(fact, &query_vector, now, options.min_score))
                .collect();
            (table.facts.len(), hits)
        };

        // Stable sort keeps scan order for equal scores
        hits.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });
        hits.truncate(options.limit);

        debug!(
            scanned,
            returned = hits.len(),
            top_score = hits.first().map(|h| h.final_score),
            "Fact search complete"
        );

        Ok(hits)
    }

    fn score(
        &self,
        fact: &MemoryFact,
        query_vector: &[f32],
        now: DateTime<Utc>,
        min_score: f32,
    ) -> Option<SearchHit> {
        let raw = cosine_similarity(query_vector, &fact.embedding);
        if raw.is_nan() || raw <= 0.0 {
            return None;
        }

        let boost = recency_boost(fact.meeting_date, now, self.recency_half_life_days);
        let combined = final_score(raw, boost);
        if combined < min_score {
            return None;
        }

        Some(SearchHit::from_fact(fact, raw, boost, combined))
    }
}

impl Default for FactStore {
    fn default() -> Self {
        Self::offline()
    }
}
