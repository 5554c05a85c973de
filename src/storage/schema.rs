//! Database schema for the SQLite catalog store.
//!
//! Creates tables for:
//! - trips: immutable candidate records
//! - feedback_aggregates: one running tally per trip (1:1 with trips)
//! - feedback_events: append-only feedback log, keyed by insertion order

use rusqlite::Connection;

pub const CATALOG_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS trips (
    id INTEGER PRIMARY KEY NOT NULL CHECK(id > 0),
    destination TEXT NOT NULL,
    budget REAL NOT NULL CHECK(budget > 0),
    days INTEGER NOT NULL CHECK(days > 0),
    travel_type TEXT NOT NULL,
    interests TEXT NOT NULL DEFAULT '[]',
    base_popularity REAL NOT NULL DEFAULT 0 CHECK(base_popularity >= 0),
    itinerary TEXT NOT NULL DEFAULT '[]',
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS feedback_aggregates (
    trip_id INTEGER PRIMARY KEY NOT NULL,
    like_count INTEGER NOT NULL DEFAULT 0,
    dislike_count INTEGER NOT NULL DEFAULT 0,
    rating_sum INTEGER NOT NULL DEFAULT 0,
    rating_count INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (trip_id) REFERENCES trips(id)
);

CREATE TABLE IF NOT EXISTS feedback_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trip_id INTEGER NOT NULL,
    user_id TEXT,
    rating INTEGER NOT NULL CHECK(rating BETWEEN 1 AND 5),
    liked INTEGER NOT NULL,
    comment TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (trip_id) REFERENCES trips(id)
);

CREATE INDEX IF NOT EXISTS idx_feedback_events_trip ON feedback_events(trip_id, id);
CREATE INDEX IF NOT EXISTS idx_trips_travel_type ON trips(travel_type);
"#;

/// Create catalog tables
///
/// Safe to call multiple times (uses IF NOT EXISTS).
pub fn init_catalog_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
    conn.execute_batch(CATALOG_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_catalog_tables(&conn).unwrap();
        init_catalog_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'feedback_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_rating_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        init_catalog_tables(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO feedback_events (trip_id, rating, liked, created_at) VALUES (1, 9, 1, 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
