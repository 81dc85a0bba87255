//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - MemoryFact: Embedded statement extracted from a meeting
//! - SearchHit: Scored view of a fact for one query
//! - RecallDecision: Surface/interject outcome for one utterance

mod decision;
mod fact;
mod hit;

pub use decision::*;
pub use fact::*;
pub use hit::*;
