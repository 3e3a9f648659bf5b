//! Briefing: personal content briefings ranked by learned topic interest.
//!
//! The scoring engine lives in `interest-core`; this crate wires it to a
//! config file, an on-disk SQLite store and the `briefing` CLI.

pub mod config;
pub mod topics_cli;

use anyhow::{Context, Result};
use config::AppConfig;
use interest_core::{InterestEngine, SqliteTopicStore};
use std::path::Path;
use std::sync::Arc;

/// Open the configured SQLite store and build an engine on it.
///
/// The parent directory of `store.db_path` is created if needed.
pub fn open_engine(config: &AppConfig) -> Result<InterestEngine> {
    let db_path = Path::new(&config.store.db_path);
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }
    }

    let store = SqliteTopicStore::open(db_path)
        .with_context(|| format!("Failed to open topic store: {}", db_path.display()))?;
    tracing::debug!("Opened topic store at {}", db_path.display());

    InterestEngine::new(Arc::new(store), config.scoring.clone())
        .with_context(|| "Failed to build interest engine")
}
