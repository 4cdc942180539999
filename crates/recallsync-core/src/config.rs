//! Configuration module for recallsync.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, and defaults. Freshness windows default
//! to the values the UI layer was tuned for (20-60 seconds per key family).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::KeyFamily;

/// Top-level configuration for recallsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub study: StudyConfig,
    pub logging: LoggingConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend REST API.
    pub base_url: String,
    /// Bearer token for authenticated requests. `None` until provisioned.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Cache freshness windows, in seconds, per key family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub decks_list_stale_secs: u64,
    pub deck_item_stale_secs: u64,
    pub cards_list_stale_secs: u64,
    pub card_item_stale_secs: u64,
    pub study_next_stale_secs: u64,
    pub study_progress_stale_secs: u64,
    pub due_count_stale_secs: u64,
}

impl CacheConfig {
    /// Returns the freshness window for one key family.
    pub fn stale_after(&self, family: KeyFamily) -> Duration {
        let secs = match family {
            KeyFamily::DecksList => self.decks_list_stale_secs,
            KeyFamily::DeckItems => self.deck_item_stale_secs,
            KeyFamily::CardsLists => self.cards_list_stale_secs,
            KeyFamily::CardItems => self.card_item_stale_secs,
            KeyFamily::StudyNext => self.study_next_stale_secs,
            KeyFamily::StudyProgress => self.study_progress_stale_secs,
            KeyFamily::StudyDueCount => self.due_count_stale_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Study session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Default number of due items fetched per session.
    pub default_limit: u32,
    /// Limit used when probing for a deck's due count. The backend has no
    /// count endpoint, so the client fetches up to this many items and
    /// counts them.
    pub due_count_probe_limit: u32,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/recallsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("recallsync")
            .join("config.yaml")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            decks_list_stale_secs: 30,
            deck_item_stale_secs: 60,
            cards_list_stale_secs: 30,
            card_item_stale_secs: 60,
            study_next_stale_secs: 30,
            study_progress_stale_secs: 60,
            due_count_stale_secs: 20,
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            due_count_probe_limit: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"api.base_url"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- api ---
        if self.api.base_url.is_empty() {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: "must not be empty".into(),
            });
        } else if !self.api.base_url.starts_with("http://")
            && !self.api.base_url.starts_with("https://")
        {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: format!("must be an http(s) URL: {}", self.api.base_url),
            });
        }
        if self.api.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "api.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- study ---
        if self.study.default_limit == 0 {
            errors.push(ValidationError {
                field: "study.default_limit".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.study.due_count_probe_limit < self.study.default_limit {
            errors.push(ValidationError {
                field: "study.due_count_probe_limit".into(),
                message: "must be at least study.default_limit".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of {:?}, got {:?}",
                    VALID_LOG_LEVELS, self.logging.level
                ),
            });
        }

        errors
    }
}
