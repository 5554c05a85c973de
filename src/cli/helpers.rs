//! Shared helper functions for CLI commands
//!
//! Store selection, config loading and JSON output.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tripmatch_core::{
    config::IN_MEMORY_DB, CatalogStore, InMemoryStore, SqliteStore, TripmatchConfig,
};

/// Open the store named by `db_path`; `:memory:` selects the in-memory store
pub async fn open_store(db_path: &str) -> anyhow::Result<Arc<dyn CatalogStore>> {
    if db_path == IN_MEMORY_DB {
        debug!("Using in-memory catalog store");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    debug!("Opening SQLite catalog at {}", db_path);
    let store = SqliteStore::open(db_path)
        .await
        .with_context(|| format!("Failed to open database '{}'", db_path))?;
    Ok(Arc::new(store))
}

/// Load configuration from a file, or defaults when none is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<TripmatchConfig> {
    match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            TripmatchConfig::from_file(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))
        }
        None => Ok(TripmatchConfig::default()),
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
