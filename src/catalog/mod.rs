//! Catalog ingest: file import and the demo seed.

pub mod seed;

use crate::error::{Result, TripmatchError};
use crate::storage::CatalogStore;
use crate::types::{FeedbackEvent, NewTrip, TripId};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Layout of a TOML catalog file: a list of `[[trips]]` tables
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    trips: Vec<NewTrip>,
}

/// Outcome of loading the demo seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub trips: usize,
    pub feedback: usize,
}

/// Parse trips from a `.json` array or a `.toml` file with `[[trips]]`
pub fn load_trips(path: &Path) -> Result<Vec<NewTrip>> {
    let contents = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => parse_json(&contents),
        Some("toml") => parse_toml(&contents),
        _ => Err(TripmatchError::Validation(format!(
            "unsupported catalog file '{}': expected .json or .toml",
            path.display()
        ))),
    }
}

pub fn parse_json(contents: &str) -> Result<Vec<NewTrip>> {
    Ok(serde_json::from_str(contents)?)
}

pub fn parse_toml(contents: &str) -> Result<Vec<NewTrip>> {
    let catalog: TomlCatalog = toml::from_str(contents)
        .map_err(|e| TripmatchError::Validation(format!("invalid TOML catalog: {}", e)))?;
    Ok(catalog.trips)
}

/// Insert trips in order, stopping at the first rejected one
pub async fn import_trips(store: &dyn CatalogStore, trips: Vec<NewTrip>) -> Result<Vec<TripId>> {
    let mut ids = Vec::with_capacity(trips.len());
    for trip in trips {
        let destination = trip.destination.clone();
        let id = store.insert_trip(trip).await.map_err(|e| match e {
            TripmatchError::Validation(msg) => {
                TripmatchError::Validation(format!("trip '{}': {}", destination, msg))
            }
            other => other,
        })?;
        debug!("Imported trip {} ({})", id, destination);
        ids.push(id);
    }
    info!("Imported {} trip(s)", ids.len());
    Ok(ids)
}

/// Load the demo catalog and demo feedback into an empty store
///
/// Does nothing when the catalog already holds trips.
pub async fn seed_demo(store: &dyn CatalogStore) -> Result<SeedReport> {
    if store.count_trips().await? > 0 {
        info!("Catalog already populated, skipping demo seed");
        return Ok(SeedReport {
            trips: 0,
            feedback: 0,
        });
    }

    let trips = import_trips(store, seed::demo_trips()).await?.len();

    let mut feedback = 0;
    for demo in seed::demo_feedback() {
        let event = FeedbackEvent {
            trip_id: demo.trip_id,
            user_id: Some("demo".to_string()),
            rating: demo.rating,
            liked: demo.liked,
            comment: Some(demo.comment.to_string()),
            timestamp: Utc::now(),
        };
        store.apply_feedback(&event).await?;
        feedback += 1;
    }

    info!(
        "Seeded demo catalog: {} trip(s), {} feedback event(s)",
        trips, feedback
    );
    Ok(SeedReport { trips, feedback })
}
