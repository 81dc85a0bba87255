//! Adapters
//!
//! Concrete implementations of the ports.

mod hash_embedder;
mod openai_embedder;

pub use hash_embedder::*;
pub use openai_embedder::*;

use std::sync::Arc;

use crate::config::{EmbedderConfig, EmbedderProvider, StoreConfig};
use crate::domain::errors::DomainError;
use crate::ports::Embedder;

/// Build the embedder selected by config
pub fn build_embedder(
    embedder: &EmbedderConfig,
    store: &StoreConfig,
) -> Result<Arc<dyn Embedder>, DomainError> {
    match embedder.provider {
        EmbedderProvider::Hash => Ok(Arc::new(HashEmbedder::new(store.hash_embedding_dim)?)),
        EmbedderProvider::OpenAi => Ok(Arc::new(OpenAiEmbedder::from_config(embedder)?)),
    }
}
