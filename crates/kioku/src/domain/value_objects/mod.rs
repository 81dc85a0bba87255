//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod recall_reason;
mod search_options;

pub use recall_reason::*;
pub use search_options::*;
