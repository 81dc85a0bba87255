//! Built-in demo meeting: two seeded facts and four live utterances.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use kioku::{NewFact, UtteranceInput};

pub const DEMO_COOLDOWN_SECONDS: f64 = 20.0;

/// The demo replays as if the meeting were happening on 2025-03-05,
/// so the seeded facts stay inside the default recency cutoff.
pub fn meeting_clock() -> Result<DateTime<Utc>> {
    date(2025, 3, 5, 12)
}

fn date(year: i32, month: u32, day: u32, hour: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .with_context(|| format!("Invalid demo date {year}-{month:02}-{day:02} {hour:02}:00"))
}

pub fn seed_facts() -> Result<Vec<NewFact>> {
    Ok(vec![
        NewFact::new("mtg_001", "Bob owns the API cutoff for March 5.")
            .with_type("action")
            .with_meeting_date(date(2025, 3, 1, 0)?)
            .with_participants(["bob@example.com", "alice@example.com"])
            .with_topics(["api", "cutoff"])
            .with_tags(["deadline"]),
        NewFact::new("mtg_002", "We agreed to ship the mobile beta by April 10.")
            .with_type("decision")
            .with_meeting_date(date(2025, 3, 5, 0)?)
            .with_participants(["alice@example.com"])
            .with_topics(["mobile", "beta"])
            .with_tags(["shipdate"]),
    ])
}

pub fn utterances() -> Vec<UtteranceInput> {
    [
        "Can we confirm the API cutoff date?",
        "Also what is the mobile beta ship date?",
        "Random small talk unrelated to work.",
        "Remind me who owns the API workstream?",
    ]
    .into_iter()
    .map(|u| {
        UtteranceInput::new(u)
            .with_participants(["bob@example.com"])
            .with_topics(["api", "mobile"])
    })
    .collect()
}
