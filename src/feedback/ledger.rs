//! Feedback ledger: validates and records like/dislike events.

use crate::config::TripmatchConfig;
use crate::error::{Result, TripmatchError};
use crate::recommend::scorer::LikelihoodScorer;
use crate::storage::{CatalogStore, ReadRetry};
use crate::types::{Confidence, FeedbackAggregate, FeedbackEvent, FeedbackSubmission, TripId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Acknowledgement returned once an event has been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub trip_id: TripId,
    pub aggregate: FeedbackAggregate,
    pub like_probability: f64,
    pub confidence: Confidence,
    pub average_rating: Option<f64>,
}

/// Records feedback against a catalog store
#[derive(Clone)]
pub struct FeedbackLedger {
    store: Arc<dyn CatalogStore>,
    scorer: LikelihoodScorer,
    retry: ReadRetry,
}

impl FeedbackLedger {
    pub fn new(store: Arc<dyn CatalogStore>, config: &TripmatchConfig) -> Self {
        Self {
            store,
            scorer: LikelihoodScorer::new(&config.scoring),
            retry: config.storage.clone().into(),
        }
    }

    /// Validate and apply one submission
    ///
    /// The store write is attempted exactly once; a failure is returned to the
    /// caller and the aggregate is left as it was.
    pub async fn record(&self, submission: FeedbackSubmission) -> Result<FeedbackAck> {
        let rating = validate_rating(submission.rating)?;

        let event = FeedbackEvent {
            trip_id: submission.trip_id,
            user_id: submission
                .user_id
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            rating,
            liked: submission.liked,
            comment: submission
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            timestamp: Utc::now(),
        };

        let aggregate = self.store.apply_feedback(&event).await.map_err(|e| {
            warn!("Feedback for trip {} not recorded: {}", event.trip_id, e);
            e
        })?;
        let score = self.scorer.score(&aggregate);

        info!(
            "Recorded {} (rating {}) for trip {}: {} like(s), {} dislike(s)",
            if event.liked { "like" } else { "dislike" },
            rating,
            event.trip_id,
            aggregate.like_count,
            aggregate.dislike_count
        );

        Ok(FeedbackAck {
            trip_id: event.trip_id,
            aggregate,
            like_probability: score.like_probability,
            confidence: score.confidence,
            average_rating: aggregate.average_rating(),
        })
    }

    /// Current aggregate for a trip; `UnknownTrip` if it does not exist
    pub async fn aggregate_for(&self, trip_id: TripId) -> Result<FeedbackAggregate> {
        let store = self.store.clone();
        self.retry
            .run("feedback aggregate", || {
                let store = store.clone();
                async move { store.aggregate_for(trip_id).await }
            })
            .await
    }

    /// Most recent events for a trip, newest first
    pub async fn events_for(&self, trip_id: TripId, limit: usize) -> Result<Vec<FeedbackEvent>> {
        let store = self.store.clone();
        self.retry
            .run("feedback events", || {
                let store = store.clone();
                async move { store.recent_feedback(trip_id, limit).await }
            })
            .await
    }
}

fn validate_rating(rating: i64) -> Result<u8> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        // In range, so the narrowing cannot truncate.
        Ok(rating as u8)
    } else {
        Err(TripmatchError::InvalidRating(rating))
    }
}
