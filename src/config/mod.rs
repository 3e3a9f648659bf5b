//! Application configuration loaded from `config.toml`.

use anyhow::{Context, Result};
use interest_core::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config directory name under `$HOME`.
pub const APP_DIR_NAME: &str = ".briefing";

/// Environment variable overriding `store.db_path`.
pub const DB_PATH_ENV: &str = "BRIEFING_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// SQLite file holding topic scores. `~` is expanded.
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_db_path() -> String {
    format!("~/{APP_DIR_NAME}/topics.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_config_path() -> String {
    format!("~/{APP_DIR_NAME}/config.toml")
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let mut config = if Path::new(expanded.as_ref()).exists() {
            let content = fs::read_to_string(expanded.as_ref())
                .with_context(|| format!("Failed to read config file: {path}"))?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(db_path) = std::env::var(DB_PATH_ENV) {
            if !db_path.trim().is_empty() {
                config.store.db_path = db_path;
            }
        }

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse TOML config")
    }

    pub fn expand_paths(&mut self) {
        self.store.db_path = shellexpand::tilde(&self.store.db_path).to_string();
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.db_path.trim().is_empty() {
            anyhow::bail!("store.db_path must not be empty");
        }
        self.scoring
            .validate()
            .with_context(|| "Invalid [scoring] section")?;
        Ok(())
    }
}
