//! Error types for the tripmatch recommendation engine
//!
//! Library code returns [`TripmatchError`] through the [`Result`] alias. The
//! binary wraps these in `anyhow` at the edge.

use crate::types::TripId;
use thiserror::Error;

/// Main error type for tripmatch operations
#[derive(Error, Debug)]
pub enum TripmatchError {
    /// Malformed query or feedback input (non-positive budget, bad travel type, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Feedback rating outside 1..=5
    #[error("Invalid rating: {0} (expected an integer between 1 and 5)")]
    InvalidRating(i64),

    /// Feedback submitted against a trip that is not in the catalog
    #[error("Unknown trip: {0}")]
    UnknownTrip(TripId),

    /// The catalog holds no candidates at all
    #[error("Catalog is empty: no trips available to recommend")]
    EmptyCatalog,

    /// Store I/O failed
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl TripmatchError {
    /// Whether a failed read may be attempted again.
    ///
    /// Only store I/O failures qualify. Writes never consult this.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TripmatchError::Database(_))
    }
}

/// Result type alias for tripmatch operations
pub type Result<T> = std::result::Result<T, TripmatchError>;

impl From<rusqlite::Error> for TripmatchError {
    fn from(err: rusqlite::Error) -> Self {
        TripmatchError::Database(err.to_string())
    }
}

/// Convert anyhow::Error to TripmatchError
impl From<anyhow::Error> for TripmatchError {
    fn from(err: anyhow::Error) -> Self {
        TripmatchError::Other(err.to_string())
    }
}
