//! Embedder Port
//!
//! Abstract interface for text embedding generation.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// Service interface for generating text embeddings
///
/// Implementations may suspend (network or CPU-bound work) and may fail;
/// callers propagate both.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding vector for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "embedder"
    }
}

