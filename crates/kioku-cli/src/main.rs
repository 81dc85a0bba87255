//! Kioku CLI - Replay meeting facts against live utterances
//!
//! Seeds a fact store, runs utterances through the recall orchestrator and
//! prints what would be shown on the HUD or spoken aloud.

mod config;
mod demo;

use anyhow::{bail, Context, Result};
use chrono::Duration;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use kioku::{
    EmbedderProvider, FactStore, KiokuConfig, NewFact, RecallDecision, RecallOrchestrator,
    SearchHit, SearchOptions, UtteranceInput,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kioku")]
#[command(about = "Kioku CLI - Meeting fact recall", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/kioku/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in two-meeting demo
    Demo {
        /// Use the offline hash embedder regardless of config
        #[arg(long)]
        offline: bool,
    },

    /// Load facts, then process each line of an utterance file
    Replay {
        /// JSON array of facts
        #[arg(long)]
        facts: PathBuf,
        /// Text file, one utterance per line
        #[arg(long)]
        utterances: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Load facts and run a single similarity query
    Search {
        /// JSON array of facts
        #[arg(long)]
        facts: PathBuf,
        /// Search query
        query: String,
        /// Max results
        #[arg(short, long, default_value = "8")]
        limit: usize,
        /// Minimum final score
        #[arg(long, default_value = "0.25")]
        min_score: f32,
        /// Ignore facts older than this many days
        #[arg(long, default_value = "120", conflicts_with = "all_time")]
        since_days: f64,
        /// Disable the age cutoff
        #[arg(long)]
        all_time: bool,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show effective configuration
    Config,
}

#[derive(Args)]
struct FilterArgs {
    /// Participants filter (comma-separated)
    #[arg(long, value_delimiter = ',')]
    participants: Vec<String>,
    /// Topics filter (comma-separated)
    #[arg(long, value_delimiter = ',')]
    topics: Vec<String>,
    /// Tags filter (comma-separated)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kioku=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;
    tracing::debug!(
        embedder = %settings.embedder.provider,
        half_life_days = settings.store.recency_half_life_days,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Demo { offline } => cmd_demo(settings, offline).await,
        Commands::Replay { facts, utterances, filters } => {
            cmd_replay(settings, facts, utterances, filters).await
        }
        Commands::Search {
            facts,
            query,
            limit,
            min_score,
            since_days,
            all_time,
            filters,
        } => {
            let options = SearchOptions::default()
                .with_participants(filters.participants)
                .with_topics(filters.topics)
                .with_tags(filters.tags)
                .with_since_days(if all_time { None } else { Some(since_days) })
                .with_limit(limit)
                .with_min_score(min_score);
            cmd_search(settings, facts, query, options).await
        }
        Commands::Config => cmd_config(&settings, cli.config),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_demo(mut settings: KiokuConfig, offline: bool) -> Result<()> {
    if offline {
        settings.embedder.provider = EmbedderProvider::Hash;
    }
    settings.recall.cooldown_seconds = demo::DEMO_COOLDOWN_SECONDS;

    let store = FactStore::from_config(&settings).context("Failed to build fact store")?;
    store.bulk_add(demo::seed_facts()?).await?;

    println!(
        "{} Seeded {} facts ({} embedder)",
        "✓".green(),
        store.len().await,
        store.embedder_name().cyan()
    );

    let orchestrator = RecallOrchestrator::new(store, settings.recall);
    let start = demo::meeting_clock()?;

    for (i, input) in demo::utterances().into_iter().enumerate() {
        println!("\n{} {}", ">".dimmed(), input.utterance);
        let decision = orchestrator
            .process_utterance_at(input, start + Duration::seconds(i as i64))
            .await?;
        print_decision(&decision);
    }

    Ok(())
}

async fn cmd_replay(
    settings: KiokuConfig,
    facts: PathBuf,
    utterances: PathBuf,
    filters: FilterArgs,
) -> Result<()> {
    let store = load_store(&settings, &facts).await?;
    let orchestrator = RecallOrchestrator::new(store, settings.recall);

    let content = fs::read_to_string(&utterances)
        .with_context(|| format!("Failed to read utterances: {:?}", utterances))?;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let input = UtteranceInput::new(line)
            .with_participants(filters.participants.iter().cloned())
            .with_topics(filters.topics.iter().cloned())
            .with_tags(filters.tags.iter().cloned());

        println!("\n{} {}", ">".dimmed(), line);
        let decision = orchestrator.process_utterance(input).await?;
        print_decision(&decision);
    }

    Ok(())
}

async fn cmd_search(
    settings: KiokuConfig,
    facts: PathBuf,
    query: String,
    options: SearchOptions,
) -> Result<()> {
    let store = load_store(&settings, &facts).await?;
    let hits = store.search(&query, &options).await?;

    if hits.is_empty() {
        println!("No facts found for '{}'", query);
        return Ok(());
    }

    println!("{} results for '{}':", hits.len().to_string().green(), query);
    for hit in &hits {
        print_hit(hit);
    }

    Ok(())
}

fn cmd_config(settings: &KiokuConfig, explicit: Option<PathBuf>) -> Result<()> {
    let path = match explicit {
        Some(p) => p,
        None => config::config_path()?,
    };

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", path);
    println!("{}", config::render(settings)?);

    Ok(())
}

// ============================================
// Helpers
// ============================================

async fn load_store(settings: &KiokuConfig, facts: &Path) -> Result<FactStore> {
    let content =
        fs::read_to_string(facts).with_context(|| format!("Failed to read facts: {:?}", facts))?;
    let inputs: Vec<NewFact> =
        serde_json::from_str(&content).with_context(|| "Failed to parse facts file")?;

    if inputs.is_empty() {
        bail!("Facts file {:?} contains no facts", facts);
    }

    let store = FactStore::from_config(settings).context("Failed to build fact store")?;
    let ids = store.bulk_add(inputs).await?;

    println!(
        "{} Loaded {} facts ({} embedder)",
        "✓".green(),
        ids.len(),
        store.embedder_name().cyan()
    );

    Ok(store)
}

fn print_decision(decision: &RecallDecision) {
    let reason = decision.reason.to_string();
    println!("  {} {}", "reason:".dimmed(), reason.yellow());

    let Some(top) = decision.top_hit() else {
        return;
    };

    if decision.should_surface {
        println!(
            "  {} {} (from {})",
            "[HUD]".cyan().bold(),
            top.fact_text,
            top.meeting_date.format("%Y-%m-%d")
        );
    }
    if decision.should_interject {
        println!("  {} {}", "[TTS]".magenta().bold(), top.fact_text);
    }
}

fn print_hit(hit: &SearchHit) {
    let badge = format!("[{}]", hit.fact_type).dimmed();
    println!(
        "  {:.3} {} {} {}",
        hit.final_score,
        badge,
        hit.fact_text,
        format!(
            "(cos {:.3}, recency {:.3}, {})",
            hit.score,
            hit.recency_boost,
            hit.meeting_date.format("%Y-%m-%d")
        )
        .dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_facts_parse() {
        let inputs: Vec<NewFact> =
            serde_json::from_str(include_str!("../../../demos/facts.json")).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].source_turn, Some(12));
        assert!(inputs.iter().all(|f| f.validate().is_ok()));
    }

    #[test]
    fn test_cli_parses_search_filters() {
        let cli = Cli::try_parse_from([
            "kioku",
            "search",
            "--facts",
            "facts.json",
            "--topics",
            "api,mobile",
            "--all-time",
            "API cutoff",
        ])
        .unwrap();

        match cli.command {
            Commands::Search { filters, all_time, query, .. } => {
                assert_eq!(filters.topics, vec!["api", "mobile"]);
                assert!(all_time);
                assert_eq!(query, "API cutoff");
            }
            _ => panic!("expected search command"),
        }
    }
}
