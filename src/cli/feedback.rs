//! Feedback submission command

use super::helpers::{open_store, print_json};
use tripmatch_core::{
    api::dto::FeedbackResponse, FeedbackLedger, FeedbackSubmission, TripId, TripmatchConfig,
};

/// Handle `feedback`
pub async fn handle(
    db_path: &str,
    config: &TripmatchConfig,
    submission: FeedbackSubmission,
) -> anyhow::Result<()> {
    let store = open_store(db_path).await?;
    let ledger = FeedbackLedger::new(store, config);

    let TripId(trip) = submission.trip_id;
    let ack = ledger.record(submission).await?;
    eprintln!("Recorded feedback for trip {}", trip);

    print_json(&FeedbackResponse::from(ack))
}
