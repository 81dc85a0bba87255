//! Kioku Memory Library
//!
//! Meeting fact memory (記憶) with real-time recall decisions.
//!
//! Facts extracted from meetings are embedded and stored; as new utterances
//! arrive, the recall orchestrator decides whether a stored fact should be
//! surfaced passively or spoken aloud.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (MemoryFact, SearchHit, RecallDecision)
//!   - `value_objects/`: Immutable value types (RecallReason, SearchOptions)
//!   - `services/`: Scoring math (cosine similarity, recency decay)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: External service interfaces (Embedder)
//!
//! - **Adapters** (`adapters/`): Embedder implementations (hash, OpenAI)
//!
//! - **Application** (`application/`): Use cases (FactStore, RecallOrchestrator)
//!
//! # Usage
//!
//! ```rust,ignore
//! use kioku::{FactStore, NewFact, RecallOrchestrator, UtteranceInput};
//!
//! let store = FactStore::offline();
//! store.add_fact(NewFact::new("mtg_001", "Bob owns the API cutoff")).await?;
//!
//! let orchestrator = RecallOrchestrator::with_defaults(store);
//! let decision = orchestrator
//!     .process_utterance(UtteranceInput::new("Who owns the API cutoff?"))
//!     .await?;
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use adapters::{HashEmbedder, OpenAiEmbedder};
pub use application::{FactStore, RecallOrchestrator, UtteranceInput};
pub use config::{EmbedderConfig, EmbedderProvider, KiokuConfig, RecallConfig, StoreConfig};
pub use domain::{
    DomainError, MemoryFact, NewFact, RecallDecision, RecallReason, SearchHit, SearchOptions,
};
pub use ports::Embedder;
