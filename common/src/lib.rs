/*!
common/src/lib.rs

Shared configuration types for newsdesk.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader that layers an override file on top of a defaults file
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address Rocket binds to
    pub bind: String,
    pub port: u16,
    /// Expose error details in 500 responses
    pub development: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            development: false,
        }
    }
}

/// Feed fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Value of the `Accept` header sent with every feed request
    pub accept: String,
    /// Only the first N entries of each feed are enriched
    pub max_items_per_feed: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            max_redirects: 5,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string(),
            accept: "application/rss+xml, application/xml, application/atom+xml, text/xml;q=0.9, */*;q=0.8".to_string(),
            max_items_per_feed: 5,
        }
    }
}

/// Extractive summary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Maximum summary length in characters
    pub max_length: usize,
    /// Number of sentences kept
    pub sentences: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_length: 150,
            sentences: 2,
        }
    }
}

/// Sentiment lexicon settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Optional path to a full AFINN word list (`word<TAB>score` per line).
    /// The bundled list is used when absent.
    pub lexicon_path: Option<String>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub summary: SummaryConfig,
    pub sentiment: SentimentConfig,
}

impl Config {
    /// Load configuration from a single TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Missing keys fall back to the built-in defaults.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: Config = toml::from_str("").expect("parse config");
        assert_eq!(cfg.server.port, 3000);
        assert!(!cfg.server.development);
        assert_eq!(cfg.fetch.timeout_seconds, 60);
        assert_eq!(cfg.fetch.max_items_per_feed, 5);
        assert_eq!(cfg.summary.max_length, 150);
        assert_eq!(cfg.summary.sentences, 2);
        assert!(cfg.sentiment.lexicon_path.is_none());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml = r#"
            [fetch]
            timeout_seconds = 10

            [server]
            development = true
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.fetch.timeout_seconds, 10);
        assert_eq!(cfg.fetch.max_redirects, 5);
        assert!(cfg.server.development);
        assert_eq!(cfg.server.port, 3000);
    }

    #[tokio::test]
    async fn override_file_wins_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let default_path = dir.path().join("config.default.toml");
        let override_path = dir.path().join("config.toml");

        fs::write(
            &default_path,
            "[server]\nport = 8080\nbind = \"127.0.0.1\"\n\n[summary]\nmax_length = 200\n",
        )
        .expect("write defaults");
        fs::write(&override_path, "[server]\nport = 9090\n").expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load config");

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.summary.max_length, 200);
    }

    #[tokio::test]
    async fn missing_files_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absent = dir.path().join("nope.toml");

        let cfg = Config::load_with_defaults(Some(&absent), None)
            .await
            .expect("load config");
        assert_eq!(cfg.server.port, 3000);
    }

    #[tokio::test]
    async fn from_file_rejects_bad_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[server\nport = ").expect("write");

        assert!(Config::from_file(&path).await.is_err());
    }
}
