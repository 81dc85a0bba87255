//! Hash Embedder - Deterministic offline embeddings
//!
//! Folds the SHA-256 digest of the text into a fixed-length vector.
//! No semantic meaning; intended for tests and no-network use.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::errors::DomainError;
use crate::ports::Embedder;

pub const DEFAULT_HASH_DIM: usize = 256;

/// SHA-256 based implementation of Embedder
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self, DomainError> {
        if dim == 0 {
            return Err(DomainError::Validation(
                "hash embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dim })
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Synchronous core of `embed`
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        let mut vec = vec![0.0f32; self.dim];
        for (i, byte) in digest.iter().enumerate() {
            vec[i % self.dim] += f32::from(*byte) / 255.0;
        }

        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in vec.iter_mut() {
                *x /= norm;
            }
        }
        vec
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_HASH_DIM,
        }
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.embed_sync(text))
    }

    fn name(&self) -> &str {
        "hash"
    }
}
