//! RecallReason - Why a recall decision came out the way it did

use serde::{Deserialize, Serialize};

/// Reason code attached to every recall decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecallReason {
    /// Nothing scored above the lower threshold
    NoHits,
    /// Hits exist but the top one is below the interject threshold
    SurfaceOnly,
    /// Interjection suppressed by the cooldown window
    Cooldown,
    /// Interjection granted
    Interject,
}

impl std::fmt::Display for RecallReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecallReason::NoHits => write!(f, "no_hits"),
            RecallReason::SurfaceOnly => write!(f, "surface_only"),
            RecallReason::Cooldown => write!(f, "cooldown"),
            RecallReason::Interject => write!(f, "interject"),
        }
    }
}

impl std::str::FromStr for RecallReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "no_hits" => Ok(RecallReason::NoHits),
            "surface_only" => Ok(RecallReason::SurfaceOnly),
            "cooldown" => Ok(RecallReason::Cooldown),
            "interject" => Ok(RecallReason::Interject),
            _ => Err(format!("Unknown recall reason: {}", s)),
        }
    }
}
