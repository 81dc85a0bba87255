//! Configuration loading for Kioku CLI
//!
//! Reads store, recall and embedder settings from ~/.config/kioku/config.toml
//! (or an explicit path). A missing file means defaults.

use anyhow::{Context, Result};
use kioku::KiokuConfig;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "kioku";
const CONFIG_FILE: &str = "config.toml";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join(CONFIG_DIR);
    Ok(config_dir)
}

/// Get the default config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Load config from `explicit` or the default path.
///
/// An explicit path must exist; the default path may be absent.
pub fn load(explicit: Option<&Path>) -> Result<KiokuConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let path = config_path()?;
            if !path.exists() {
                return Ok(KiokuConfig::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;

    parse(&content).with_context(|| format!("Failed to parse config file {:?}", path))
}

/// Parse a TOML config document
pub fn parse(content: &str) -> Result<KiokuConfig> {
    Ok(toml::from_str(content)?)
}

/// Render config as TOML with the API key masked
pub fn render(config: &KiokuConfig) -> Result<String> {
    let mut shown = config.clone();
    if shown.embedder.api_key.is_some() {
        shown.embedder.api_key = Some("********".to_string());
    }
    toml::to_string_pretty(&shown).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kioku::EmbedderProvider;

    #[test]
    fn test_parse_partial_document() {
        let config = parse(
            r#"
            [recall]
            cooldown_seconds = 20

            [embedder]
            provider = "openai"
            "#,
        )
        .unwrap();

        assert_eq!(config.recall.cooldown_seconds, 20.0);
        assert_eq!(config.recall.surface_threshold, 0.35);
        assert_eq!(config.embedder.provider, EmbedderProvider::OpenAi);
        assert_eq!(config.store.hash_embedding_dim, 256);
    }

    #[test]
    fn test_parse_sample_config() {
        let config = parse(include_str!("../../../demos/config.toml")).unwrap();
        assert_eq!(config.recall.cooldown_seconds, 20.0);
        assert_eq!(config.embedder.provider, EmbedderProvider::Hash);
    }

    #[test]
    fn test_parse_empty_document() {
        let config = parse("").unwrap();
        assert_eq!(config.recall.max_hits, 6);
    }

    #[test]
    fn test_render_masks_api_key() {
        let mut config = KiokuConfig::default();
        config.embedder.api_key = Some("sk-secret".to_string());

        let rendered = render(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("********"));
    }

    #[test]
    fn test_missing_explicit_path_errors() {
        assert!(load(Some(Path::new("/nonexistent/kioku.toml"))).is_err());
    }
}
