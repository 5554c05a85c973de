//! Storage layer for the trip catalog
//!
//! Provides the catalog store abstraction (trips, their feedback aggregates,
//! and the append-only feedback event log) plus two implementations:
//! - [`memory::InMemoryStore`]: per-trip locks, used for tests and `:memory:`
//! - [`sqlite::SqliteStore`]: rusqlite behind a deadpool connection pool

pub mod memory;
pub mod schema;
pub mod sqlite;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::types::{FeedbackAggregate, FeedbackEvent, NewTrip, TripCandidate, TripId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// A trip together with the aggregate read alongside it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub trip: TripCandidate,
    pub aggregate: FeedbackAggregate,
}

/// Storage backend trait defining all required catalog operations
///
/// Implementations must create a trip and its zeroed aggregate together, and
/// must apply a feedback event (log append plus aggregate increment) as one
/// atomic unit, serialized per trip.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Ingest a new trip; returns the id it was stored under
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripId>;

    /// Retrieve a trip by ID
    async fn get_trip(&self, id: TripId) -> Result<Option<TripCandidate>>;

    /// Number of trips in the catalog
    async fn count_trips(&self) -> Result<usize>;

    /// Every trip with its current aggregate, ordered by id
    async fn snapshot(&self) -> Result<Vec<CatalogEntry>>;

    /// Aggregate for one trip; `UnknownTrip` if absent
    async fn aggregate_for(&self, id: TripId) -> Result<FeedbackAggregate>;

    /// Append the event and fold it into the trip's aggregate atomically
    ///
    /// Returns the aggregate as it stands after the update. Fails with
    /// `UnknownTrip` without side effects when the trip does not exist.
    async fn apply_feedback(&self, event: &FeedbackEvent) -> Result<FeedbackAggregate>;

    /// Most recent events for a trip, newest first
    async fn recent_feedback(&self, id: TripId, limit: usize) -> Result<Vec<FeedbackEvent>>;
}

/// Bounded retry policy for idempotent store reads
#[derive(Debug, Clone, Copy)]
pub struct ReadRetry {
    pub attempts: u32,
    pub backoff: Duration,
}

impl ReadRetry {
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    /// Run a read, retrying retryable failures up to `attempts` times
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    warn!(
                        "Read '{}' failed (attempt {}/{}): {}",
                        what, attempt, self.attempts, e
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for ReadRetry {
    fn default() -> Self {
        StorageConfig::default().into()
    }
}

impl From<StorageConfig> for ReadRetry {
    fn from(config: StorageConfig) -> Self {
        Self::new(config.read_retry_attempts, config.read_retry_backoff)
    }
}
