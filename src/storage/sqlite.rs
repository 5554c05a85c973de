//! SQLite catalog store implementation
//!
//! Uses rusqlite behind a deadpool-sqlite connection pool. Blocking SQLite
//! work runs inside `interact`, off the async executor. Every write is a
//! single `BEGIN IMMEDIATE` transaction, so SQLite's writer lock gives the
//! per-trip serialization feedback updates need.

use crate::error::{Result, TripmatchError};
use crate::storage::schema::init_catalog_tables;
use crate::storage::{CatalogEntry, CatalogStore};
use crate::types::{
    FeedbackAggregate, FeedbackEvent, ItineraryDay, NewTrip, TravelType, TripCandidate, TripId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_sqlite::{Config, Pool, PoolConfig, Runtime};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default connection pool size
const DEFAULT_POOL_SIZE: usize = 8;

/// How long a connection waits on SQLite's lock before reporting busy
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const TRIP_COLUMNS: &str = "t.id, t.destination, t.budget, t.days, t.travel_type, \
     t.interests, t.base_popularity, t.itinerary";

const AGGREGATE_COLUMNS: &str = "a.like_count, a.dislike_count, a.rating_sum, a.rating_count";

/// Catalog store persisted in a SQLite database file
pub struct SqliteStore {
    pool: Pool,
    path: String,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `db_path` and ensure the schema
    ///
    /// # Example
    /// ```ignore
    /// let store = SqliteStore::open("tripmatch.db").await?;
    /// ```
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Self::with_pool_size(db_path, DEFAULT_POOL_SIZE).await
    }

    /// Open with a custom pool size
    pub async fn with_pool_size<P: AsRef<Path>>(db_path: P, pool_size: usize) -> Result<Self> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let path_str = path.to_string_lossy().to_string();
        info!(
            "Opening SQLite catalog at: {} (pool_size: {})",
            path_str, pool_size
        );

        let mut config = Config::new(path_str.clone());
        config.pool = Some(PoolConfig::new(pool_size.max(1)));
        let pool = config.create_pool(Runtime::Tokio1).map_err(|e| {
            TripmatchError::Database(format!("Failed to create connection pool: {}", e))
        })?;

        let store = Self {
            pool,
            path: path_str,
        };
        store
            .interact(|conn| {
                init_catalog_tables(conn)?;
                Ok(())
            })
            .await?;

        info!("SQLite catalog ready");
        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run blocking work on a pooled connection
    async fn interact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.get().await.map_err(|e| {
            TripmatchError::Database(format!("Failed to get connection from pool: {}", e))
        })?;

        conn.interact(move |conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            f(conn)
        })
        .await
        .map_err(|e| TripmatchError::Database(format!("Pool interaction failed: {}", e)))?
    }
}

/// Raw trip columns, before JSON and enum decoding
struct TripRow {
    id: i64,
    destination: String,
    budget: f64,
    days: i64,
    travel_type: String,
    interests: String,
    base_popularity: f64,
    itinerary: String,
}

impl TripRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            destination: row.get(1)?,
            budget: row.get(2)?,
            days: row.get(3)?,
            travel_type: row.get(4)?,
            interests: row.get(5)?,
            base_popularity: row.get(6)?,
            itinerary: row.get(7)?,
        })
    }

    fn into_candidate(self) -> Result<TripCandidate> {
        let travel_type: TravelType = self.travel_type.parse().map_err(|_| {
            TripmatchError::Other(format!(
                "Trip {} has unknown travel_type '{}'",
                self.id, self.travel_type
            ))
        })?;
        let interests: BTreeSet<String> = serde_json::from_str(&self.interests)?;
        let itinerary: Vec<ItineraryDay> = serde_json::from_str(&self.itinerary)?;

        Ok(TripCandidate {
            id: TripId(self.id as u64),
            destination: self.destination,
            budget: self.budget,
            days: self.days as u32,
            travel_type,
            interests,
            base_popularity: self.base_popularity,
            itinerary,
        })
    }
}

/// Read aggregate columns starting at `offset`
fn aggregate_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<FeedbackAggregate> {
    Ok(FeedbackAggregate {
        like_count: row.get::<_, i64>(offset)? as u64,
        dislike_count: row.get::<_, i64>(offset + 1)? as u64,
        rating_sum: row.get::<_, i64>(offset + 2)? as u64,
        rating_count: row.get::<_, i64>(offset + 3)? as u64,
    })
}

fn load_aggregate(conn: &Connection, id: TripId) -> Result<Option<FeedbackAggregate>> {
    let sql = format!(
        "SELECT {} FROM feedback_aggregates a WHERE a.trip_id = ?1",
        AGGREGATE_COLUMNS
    );
    let aggregate = conn
        .query_row(&sql, params![id.0 as i64], |row| aggregate_from_row(row, 0))
        .optional()?;
    Ok(aggregate)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TripmatchError::Other(format!("Invalid event timestamp '{}': {}", raw, e)))
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn insert_trip(&self, trip: NewTrip) -> Result<TripId> {
        let trip = trip.validate()?;
        debug!("Storing trip: {}", trip.destination);

        self.interact(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let id = match trip.id {
                Some(id) => {
                    let exists: bool = tx.query_row(
                        "SELECT EXISTS(SELECT 1 FROM trips WHERE id = ?1)",
                        params![id.0 as i64],
                        |row| row.get(0),
                    )?;
                    if exists {
                        return Err(TripmatchError::Validation(format!(
                            "trip id {} already exists",
                            id
                        )));
                    }
                    id
                }
                None => {
                    let next: i64 =
                        tx.query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM trips", [], |row| {
                            row.get(0)
                        })?;
                    TripId(next as u64)
                }
            };

            tx.execute(
                r#"
                INSERT INTO trips (
                    id, destination, budget, days, travel_type,
                    interests, base_popularity, itinerary, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    id.0 as i64,
                    trip.destination,
                    trip.budget,
                    i64::from(trip.days),
                    trip.travel_type.as_str(),
                    serde_json::to_string(&trip.interests)?,
                    trip.base_popularity,
                    serde_json::to_string(&trip.itinerary)?,
                    Utc::now().timestamp(),
                ],
            )?;
            tx.execute(
                "INSERT INTO feedback_aggregates (trip_id) VALUES (?1)",
                params![id.0 as i64],
            )?;

            tx.commit()?;
            Ok(id)
        })
        .await
    }

    async fn get_trip(&self, id: TripId) -> Result<Option<TripCandidate>> {
        self.interact(move |conn| {
            let sql = format!("SELECT {} FROM trips t WHERE t.id = ?1", TRIP_COLUMNS);
            let row = conn
                .query_row(&sql, params![id.0 as i64], TripRow::from_row)
                .optional()?;
            row.map(TripRow::into_candidate).transpose()
        })
        .await
    }

    async fn count_trips(&self) -> Result<usize> {
        self.interact(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }

    async fn snapshot(&self) -> Result<Vec<CatalogEntry>> {
        self.interact(|conn| {
            let sql = format!(
                "SELECT {}, {} FROM trips t \
                 JOIN feedback_aggregates a ON a.trip_id = t.id \
                 ORDER BY t.id",
                TRIP_COLUMNS, AGGREGATE_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok((TripRow::from_row(row)?, aggregate_from_row(row, 8)?))
            })?;

            let mut entries = Vec::new();
            for row in rows {
                let (trip, aggregate) = row?;
                entries.push(CatalogEntry {
                    trip: trip.into_candidate()?,
                    aggregate,
                });
            }
            Ok(entries)
        })
        .await
    }

    async fn aggregate_for(&self, id: TripId) -> Result<FeedbackAggregate> {
        self.interact(move |conn| load_aggregate(conn, id)?.ok_or(TripmatchError::UnknownTrip(id)))
            .await
    }

    async fn apply_feedback(&self, event: &FeedbackEvent) -> Result<FeedbackAggregate> {
        let event = event.clone();
        debug!(
            "Applying feedback to trip {} (liked: {}, rating: {})",
            event.trip_id, event.liked, event.rating
        );

        self.interact(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let id = event.trip_id.0 as i64;

            if load_aggregate(&tx, event.trip_id)?.is_none() {
                // Dropping the transaction rolls it back
                return Err(TripmatchError::UnknownTrip(event.trip_id));
            }

            tx.execute(
                r#"
                INSERT INTO feedback_events (trip_id, user_id, rating, liked, comment, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    id,
                    event.user_id,
                    i64::from(event.rating),
                    event.liked,
                    event.comment,
                    event.timestamp.to_rfc3339(),
                ],
            )?;

            tx.execute(
                r#"
                UPDATE feedback_aggregates
                SET like_count = like_count + ?1,
                    dislike_count = dislike_count + ?2,
                    rating_sum = rating_sum + ?3,
                    rating_count = rating_count + 1
                WHERE trip_id = ?4
                "#,
                params![
                    i64::from(event.liked),
                    i64::from(!event.liked),
                    i64::from(event.rating),
                    id,
                ],
            )?;

            let aggregate = load_aggregate(&tx, event.trip_id)?
                .ok_or(TripmatchError::UnknownTrip(event.trip_id))?;
            tx.commit()?;
            Ok(aggregate)
        })
        .await
    }

    async fn recent_feedback(&self, id: TripId, limit: usize) -> Result<Vec<FeedbackEvent>> {
        self.interact(move |conn| {
            if load_aggregate(conn, id)?.is_none() {
                return Err(TripmatchError::UnknownTrip(id));
            }

            let mut stmt = conn.prepare(
                r#"
                SELECT user_id, rating, liked, comment, created_at
                FROM feedback_events
                WHERE trip_id = ?1
                ORDER BY id DESC
                LIMIT ?2
                "#,
            )?;
            let rows = stmt.query_map(params![id.0 as i64, limit as i64], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?;

            let mut events = Vec::new();
            for row in rows {
                let (user_id, rating, liked, comment, created_at) = row?;
                events.push(FeedbackEvent {
                    trip_id: id,
                    user_id,
                    rating: rating as u8,
                    liked,
                    comment,
                    timestamp: parse_timestamp(&created_at)?,
                });
            }
            Ok(events)
        })
        .await
    }
}
