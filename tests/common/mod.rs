//! Common test utilities and helpers

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use tempfile::TempDir;
use tripmatch_core::{
    api::{ApiServer, AppState},
    CatalogStore, InMemoryStore, NewTrip, SqliteStore, TravelType, TripId, TripmatchConfig,
};

/// Build a trip with a fixed id and no interests
pub fn trip(id: u64, budget: f64, days: u32, travel_type: TravelType) -> NewTrip {
    NewTrip {
        id: Some(TripId(id)),
        destination: format!("Destination {}", id),
        budget,
        days,
        travel_type,
        interests: BTreeSet::new(),
        base_popularity: 0.0,
        itinerary: vec![],
    }
}

/// In-memory store holding the given trips
pub async fn memory_store(trips: Vec<NewTrip>) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for t in trips {
        store.insert_trip(t).await.expect("insert test trip");
    }
    store
}

/// The one-trip catalog used by the reference scenarios
pub async fn single_trip_store() -> Arc<InMemoryStore> {
    memory_store(vec![trip(1, 1000.0, 5, TravelType::Leisure)]).await
}

/// SQLite store in a fresh temp directory; keep the `TempDir` alive
pub async fn sqlite_store() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let store = SqliteStore::open(dir.path().join("tripmatch.db"))
        .await
        .expect("open sqlite store");
    (store, dir)
}

/// Router over the given store with default configuration
pub fn router(store: Arc<dyn CatalogStore>) -> axum::Router {
    ApiServer::router(AppState::new(store, &TripmatchConfig::default()))
}
