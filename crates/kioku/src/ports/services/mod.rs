//! Service Ports
//!
//! Abstract interfaces for external services.

mod embedder;

pub use embedder::*;
