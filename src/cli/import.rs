//! Catalog import command

use super::helpers::open_store;
use anyhow::Context;
use std::path::Path;
use tripmatch_core::catalog;

/// Handle `import <FILE>`
pub async fn handle(db_path: &str, file: &Path) -> anyhow::Result<()> {
    let trips = catalog::load_trips(file)
        .with_context(|| format!("Failed to read catalog '{}'", file.display()))?;
    let count = trips.len();

    let store = open_store(db_path).await?;
    let ids = catalog::import_trips(store.as_ref(), trips).await?;

    println!("Imported {} of {} trip(s) from {}", ids.len(), count, file.display());
    Ok(())
}
