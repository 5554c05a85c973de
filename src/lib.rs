//! Tripmatch - constraint-relaxing trip recommendation engine
//!
//! Given a budget, a trip length, a travel type and optional interests,
//! Tripmatch returns matching trips from a fixed catalog. When nothing fits
//! exactly it relaxes the budget, then the day count, and finally falls back
//! to the most popular trips. Every result carries a like probability learned
//! from traveller feedback.
//!
//! # Architecture
//!
//! - **Types**: Core data structures (TripCandidate, Query, FeedbackAggregate, ...)
//! - **Storage**: Catalog stores (in-memory, SQLite via deadpool)
//! - **Recommend**: Matcher, relaxation planner, scorer and engine
//! - **Feedback**: Validated, atomic feedback recording
//! - **Catalog**: File import and the demo seed
//! - **API**: axum HTTP interface
//!
//! # Example
//!
//! ```ignore
//! use tripmatch_core::{InMemoryStore, Query, RecommendationEngine, TravelType, TripmatchConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> tripmatch_core::Result<()> {
//!     let store = Arc::new(InMemoryStore::new());
//!     tripmatch_core::catalog::seed_demo(store.as_ref()).await?;
//!
//!     let engine = RecommendationEngine::new(store, &TripmatchConfig::default());
//!     let query = Query::new(25000.0, 5, TravelType::Leisure, ["nature"])?;
//!     let set = engine.recommend(&query).await?;
//!
//!     println!("{} results ({})", set.recommendations.len(), set.mode);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod recommend;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::TripmatchConfig;
pub use error::{Result, TripmatchError};
pub use feedback::{FeedbackAck, FeedbackLedger};
pub use recommend::{LikelihoodScorer, RecommendationEngine, RelaxationPlanner};
pub use storage::{CatalogEntry, CatalogStore, InMemoryStore, SqliteStore};
pub use types::{
    Confidence, FeedbackAggregate, FeedbackEvent, FeedbackSubmission, ItineraryDay, MatchReason,
    NewTrip, Query, Recommendation, RecommendationMode, RecommendationSet, TravelType,
    TripCandidate, TripId,
};
