//! Configuration for the fact store, recall orchestrator and embedder.
//!
//! Every field has a serde default so a partial (or empty) TOML document
//! yields a usable configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KiokuConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub recall: RecallConfig,
    #[serde(default)]
    pub embedder: EmbedderConfig,
}

/// Fact store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Dimension of the offline hash embedder (ignored for other embedders)
    #[serde(default = "default_hash_embedding_dim")]
    pub hash_embedding_dim: usize,
    /// Half-life of the recency boost, in days (minimum 1)
    #[serde(default = "default_recency_half_life_days")]
    pub recency_half_life_days: f64,
}

fn default_hash_embedding_dim() -> usize {
    256
}

fn default_recency_half_life_days() -> f64 {
    30.0
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            hash_embedding_dim: default_hash_embedding_dim(),
            recency_half_life_days: default_recency_half_life_days(),
        }
    }
}

/// Thresholds for recall decisions (configurable)
///
/// `interject_threshold` is expected to be >= `surface_threshold` but this
/// is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Minimum top score to surface a fact
    #[serde(default = "default_surface_threshold")]
    pub surface_threshold: f32,
    /// Minimum top score to interject
    #[serde(default = "default_interject_threshold")]
    pub interject_threshold: f32,
    /// Minimum seconds between two granted interjections
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: f64,
    /// Hits requested from the store per utterance
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,
}

fn default_surface_threshold() -> f32 {
    0.35
}

fn default_interject_threshold() -> f32 {
    0.55
}

fn default_cooldown_seconds() -> f64 {
    30.0
}

fn default_max_hits() -> usize {
    6
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            surface_threshold: default_surface_threshold(),
            interject_threshold: default_interject_threshold(),
            cooldown_seconds: default_cooldown_seconds(),
            max_hits: default_max_hits(),
        }
    }
}

impl RecallConfig {
    /// Lower of the two thresholds; used as the store's `min_score`
    pub fn min_threshold(&self) -> f32 {
        self.surface_threshold.min(self.interject_threshold)
    }
}

/// Which embedder backs the store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderProvider {
    /// Deterministic SHA-256 embedder, no network
    #[default]
    Hash,
    /// OpenAI embeddings API
    OpenAi,
}

impl std::fmt::Display for EmbedderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedderProvider::Hash => write!(f, "hash"),
            EmbedderProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for EmbedderProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(EmbedderProvider::Hash),
            "openai" => Ok(EmbedderProvider::OpenAi),
            _ => Err(format!("Unknown embedder provider: {}", s)),
        }
    }
}

/// Embedder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedderConfig {
    #[serde(default)]
    pub provider: EmbedderProvider,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Falls back to `OPENAI_API_KEY` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: EmbedderProvider::default(),
            model: default_embedding_model(),
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KiokuConfig::default();
        assert_eq!(config.store.hash_embedding_dim, 256);
        assert_eq!(config.store.recency_half_life_days, 30.0);
        assert_eq!(config.recall.surface_threshold, 0.35);
        assert_eq!(config.recall.interject_threshold, 0.55);
        assert_eq!(config.recall.cooldown_seconds, 30.0);
        assert_eq!(config.recall.max_hits, 6);
        assert_eq!(config.embedder.provider, EmbedderProvider::Hash);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: KiokuConfig =
            serde_json::from_str(r#"{"recall": {"cooldown_seconds": 20}}"#).unwrap();
        assert_eq!(config.recall.cooldown_seconds, 20.0);
        assert_eq!(config.recall.max_hits, 6);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_min_threshold() {
        let inverted = RecallConfig {
            surface_threshold: 0.6,
            interject_threshold: 0.4,
            ..RecallConfig::default()
        };
        assert_eq!(inverted.min_threshold(), 0.4);
        assert_eq!(RecallConfig::default().min_threshold(), 0.35);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("OpenAI".parse::<EmbedderProvider>(), Ok(EmbedderProvider::OpenAi));
        assert!("cohere".parse::<EmbedderProvider>().is_err());
    }
}
