//! Shared handler state

use crate::config::TripmatchConfig;
use crate::feedback::FeedbackLedger;
use crate::recommend::RecommendationEngine;
use crate::storage::CatalogStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Number of feedback events shown on `GET /trips/:id`
pub const RECENT_FEEDBACK_LIMIT: usize = 10;

/// State cloned into every request handler
///
/// Carries no mutable state of its own; all writes go through the store.
#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
    pub ledger: FeedbackLedger,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: &TripmatchConfig) -> Self {
        Self {
            engine: RecommendationEngine::new(store.clone(), config),
            ledger: FeedbackLedger::new(store, config),
            started_at: Utc::now(),
        }
    }
}
