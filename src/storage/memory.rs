//! In-memory catalog store
//!
//! The catalog map sits behind one read-mostly lock; each trip's aggregate
//! has its own lock so feedback writes to different trips never contend and
//! writes to the same trip are serialized.

use crate::error::{Result, TripmatchError};
use crate::storage::{CatalogEntry, CatalogStore};
use crate::types::{FeedbackAggregate, FeedbackEvent, NewTrip, TripCandidate, TripId};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

struct TripSlot {
    trip: TripCandidate,
    aggregate: RwLock<FeedbackAggregate>,
}

/// Catalog store held entirely in process memory
#[derive(Default)]
pub struct InMemoryStore {
    trips: RwLock<BTreeMap<TripId, Arc<TripSlot>>>,
    events: Mutex<Vec<FeedbackEvent>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, id: TripId) -> Result<Arc<TripSlot>> {
        let trips = self.trips.read().await;
        trips
            .get(&id)
            .cloned()
            .ok_or(TripmatchError::UnknownTrip(id))
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripId> {
        let trip = trip.validate()?;
        let mut trips = self.trips.write().await;

        let id = match trip.id {
            Some(id) if trips.contains_key(&id) => {
                return Err(TripmatchError::Validation(format!(
                    "trip id {} already exists",
                    id
                )))
            }
            Some(id) => id,
            None => TripId(trips.keys().next_back().map_or(1, |last| last.0 + 1)),
        };

        debug!("Storing trip {}: {}", id, trip.destination);
        trips.insert(
            id,
            Arc::new(TripSlot {
                trip: trip.into_candidate(id),
                aggregate: RwLock::new(FeedbackAggregate::default()),
            }),
        );

        Ok(id)
    }

    async fn get_trip(&self, id: TripId) -> Result<Option<TripCandidate>> {
        let trips = self.trips.read().await;
        Ok(trips.get(&id).map(|slot| slot.trip.clone()))
    }

    async fn count_trips(&self) -> Result<usize> {
        Ok(self.trips.read().await.len())
    }

    async fn snapshot(&self) -> Result<Vec<CatalogEntry>> {
        let trips = self.trips.read().await;
        let mut entries = Vec::with_capacity(trips.len());
        for slot in trips.values() {
            let aggregate = *slot.aggregate.read().await;
            entries.push(CatalogEntry {
                trip: slot.trip.clone(),
                aggregate,
            });
        }
        Ok(entries)
    }

    async fn aggregate_for(&self, id: TripId) -> Result<FeedbackAggregate> {
        let slot = self.slot(id).await?;
        let aggregate = *slot.aggregate.read().await;
        Ok(aggregate)
    }

    async fn apply_feedback(&self, event: &FeedbackEvent) -> Result<FeedbackAggregate> {
        let slot = self.slot(event.trip_id).await?;

        // Holding the trip's write lock across the log append keeps the log
        // order for this trip identical to the order of aggregate updates.
        let mut aggregate = slot.aggregate.write().await;
        self.events.lock().await.push(event.clone());
        aggregate.apply(event.liked, event.rating);

        Ok(*aggregate)
    }

    async fn recent_feedback(&self, id: TripId, limit: usize) -> Result<Vec<FeedbackEvent>> {
        self.slot(id).await?;
        let events = self.events.lock().await;
        Ok(events
            .iter()
            .rev()
            .filter(|e| e.trip_id == id)
            .take(limit)
            .cloned()
            .collect())
    }
}
