//! Application Services (Use Cases)
//!
//! - FactStore: embeds and stores facts, answers filtered similarity queries
//! - RecallOrchestrator: turns utterances into surface/interject decisions

mod fact_store;
mod recall_orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

pub use fact_store::*;
pub use recall_orchestrator::*;
