//! One-shot recommendation command

use super::helpers::{open_store, print_json};
use tripmatch_core::{
    api::dto::RecommendationsResponse, Query, RecommendationEngine, TravelType, TripmatchConfig,
};

/// Handle `recommend`
pub async fn handle(
    db_path: &str,
    config: &TripmatchConfig,
    budget: f64,
    days: u32,
    travel_type: &str,
    interests: Vec<String>,
) -> anyhow::Result<()> {
    let travel_type: TravelType = travel_type.parse()?;
    let query = Query::new(budget, days, travel_type, interests)?;

    let store = open_store(db_path).await?;
    let engine = RecommendationEngine::new(store, config);
    let set = engine.recommend(&query).await?;

    print_json(&RecommendationsResponse::from(set))
}
