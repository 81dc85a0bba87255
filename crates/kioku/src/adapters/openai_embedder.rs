//! OpenAI Embedder - Vector generation via the embeddings API
//!
//! Uses OpenAI's text-embedding-3-small model (1536 dimensions) by default.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmbedderConfig;
use crate::domain::errors::DomainError;
use crate::ports::Embedder;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Network-backed implementation of Embedder
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    /// Create new embedder with the default model and endpoint
    pub fn new(api_key: String) -> Self {
        Self::from_parts(api_key, &EmbedderConfig::default())
    }

    /// Create from config; the API key comes from the config or `OPENAI_API_KEY`
    pub fn from_config(config: &EmbedderConfig) -> Result<Self, DomainError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "OpenAI embedder requires an api_key or {}",
                    OPENAI_API_KEY_ENV
                ))
            })?;
        Ok(Self::from_parts(api_key, config))
    }

    fn from_parts(api_key: String, config: &EmbedderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            DomainError::ExternalService(format!("Invalid embedding response: {e}"))
        })?;

        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::ExternalService("No embedding returned".to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
