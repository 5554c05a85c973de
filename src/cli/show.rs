//! Trip inspection command

use super::helpers::{open_store, print_json};
use tripmatch_core::{
    api::{
        dto::{TripDetail, TripView},
        state::RECENT_FEEDBACK_LIMIT,
    },
    FeedbackLedger, RecommendationEngine, TripId, TripmatchConfig,
};

/// Handle `show <TRIP_ID>`
pub async fn handle(db_path: &str, config: &TripmatchConfig, trip_id: u64) -> anyhow::Result<()> {
    let store = open_store(db_path).await?;
    let engine = RecommendationEngine::new(store.clone(), config);
    let ledger = FeedbackLedger::new(store, config);

    let id = TripId(trip_id);
    let entry = engine.entry(id).await?;
    let score = engine.scorer().score(&entry.aggregate);
    let recent_feedback = ledger.events_for(id, RECENT_FEEDBACK_LIMIT).await?;

    print_json(&TripDetail {
        view: TripView::new(entry, score),
        recent_feedback,
    })
}
