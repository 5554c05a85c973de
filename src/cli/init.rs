//! Database initialization command

use anyhow::Context;
use tracing::debug;
use tripmatch_core::{config::IN_MEMORY_DB, SqliteStore};

/// Handle database initialization command
pub async fn handle(db_path: &str) -> anyhow::Result<()> {
    if db_path == IN_MEMORY_DB {
        anyhow::bail!("Nothing to initialize for an in-memory database");
    }

    debug!("Initializing database at {}", db_path);

    // Opening creates the parent directory and the schema.
    SqliteStore::open(db_path)
        .await
        .with_context(|| format!("Failed to initialize database '{}'", db_path))?;

    println!("Database initialized: {}", db_path);
    Ok(())
}
