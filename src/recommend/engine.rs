//! Recommendation engine: the single entry point for answering a query.

use crate::config::TripmatchConfig;
use crate::error::{Result, TripmatchError};
use crate::recommend::explain::reasons_for;
use crate::recommend::planner::RelaxationPlanner;
use crate::recommend::scorer::LikelihoodScorer;
use crate::storage::{CatalogEntry, CatalogStore, ReadRetry};
use crate::types::{Query, Recommendation, RecommendationSet, TripId};
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates snapshot → planner → scorer for each query
///
/// Holds no per-request state; all shared state lives in the store.
#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn CatalogStore>,
    planner: RelaxationPlanner,
    scorer: LikelihoodScorer,
    retry: ReadRetry,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn CatalogStore>, config: &TripmatchConfig) -> Self {
        Self {
            store,
            planner: RelaxationPlanner::new(&config.engine),
            scorer: LikelihoodScorer::new(&config.scoring),
            retry: config.storage.clone().into(),
        }
    }

    pub fn scorer(&self) -> &LikelihoodScorer {
        &self.scorer
    }

    /// Every trip with its current aggregate, ordered by id
    pub async fn catalog(&self) -> Result<Vec<CatalogEntry>> {
        let store = self.store.clone();
        self.retry
            .run("catalog snapshot", || {
                let store = store.clone();
                async move { store.snapshot().await }
            })
            .await
    }

    /// One trip with its aggregate; `UnknownTrip` if absent
    pub async fn entry(&self, id: TripId) -> Result<CatalogEntry> {
        let store = self.store.clone();
        let trip = self
            .retry
            .run("trip lookup", || {
                let store = store.clone();
                async move { store.get_trip(id).await }
            })
            .await?
            .ok_or(TripmatchError::UnknownTrip(id))?;

        let aggregate = self
            .retry
            .run("feedback aggregate", || {
                let store = store.clone();
                async move { store.aggregate_for(id).await }
            })
            .await?;

        Ok(CatalogEntry { trip, aggregate })
    }

    /// Answer a query with ranked recommendations and the mode that found them
    ///
    /// Fails with `EmptyCatalog` only when the catalog has no trips.
    pub async fn recommend(&self, query: &Query) -> Result<RecommendationSet> {
        let query = &query.normalized()?;

        let entries = self.catalog().await?;
        let outcome = self.planner.plan(query, &entries, &self.scorer)?;
        let stage = outcome.stage;
        let mode = outcome.mode();

        let mut scored: Vec<_> = outcome
            .entries
            .into_iter()
            .map(|entry| (entry, self.scorer.score(&entry.aggregate)))
            .collect();

        scored.sort_by(|(a, sa), (b, sb)| {
            sb.like_probability
                .total_cmp(&sa.like_probability)
                .then_with(|| b.trip.base_popularity.total_cmp(&a.trip.base_popularity))
                .then_with(|| a.trip.id.cmp(&b.trip.id))
        });

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .map(|(entry, score)| Recommendation {
                reasons: reasons_for(
                    query,
                    &entry.trip,
                    stage,
                    &score,
                    entry.aggregate.total(),
                    self.scorer.low_threshold(),
                ),
                trip: entry.trip.clone(),
                like_probability: score.like_probability,
                confidence: score.confidence,
                mode,
                average_rating: entry.aggregate.average_rating(),
            })
            .collect();

        debug!(
            "Planner finished in {} matcher invocation(s)",
            outcome.matcher_invocations
        );
        info!(
            "Recommended {} trip(s) for {} query (mode: {})",
            recommendations.len(),
            query.travel_type,
            mode
        );

        Ok(RecommendationSet {
            mode,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use crate::types::{
        Confidence, FeedbackEvent, NewTrip, RecommendationMode, TravelType, TripId,
    };
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn new_trip(id: u64, budget: f64, days: u32, popularity: f64) -> NewTrip {
        NewTrip {
            id: Some(TripId(id)),
            destination: format!("trip-{}", id),
            budget,
            days,
            travel_type: TravelType::Leisure,
            interests: BTreeSet::new(),
            base_popularity: popularity,
            itinerary: vec![],
        }
    }

    async fn engine_with(trips: Vec<NewTrip>) -> (RecommendationEngine, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        for trip in trips {
            store.insert_trip(trip).await.unwrap();
        }
        let engine = RecommendationEngine::new(store.clone(), &TripmatchConfig::default());
        (engine, store)
    }

    fn leisure(budget: f64, days: u32) -> Query {
        Query::new(budget, days, TravelType::Leisure, Vec::<String>::new()).unwrap()
    }

    #[tokio::test]
    async fn test_single_candidate_exact() {
        let (engine, _) = engine_with(vec![new_trip(1, 1000.0, 5, 0.0)]).await;
        let set = engine.recommend(&leisure(1000.0, 5)).await.unwrap();

        assert_eq!(set.mode, RecommendationMode::Exact);
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].like_probability, 0.5);
        assert_eq!(set.recommendations[0].confidence, Confidence::Low);
        assert_eq!(set.recommendations[0].average_rating, None);
    }

    #[tokio::test]
    async fn test_hand_built_query_interests_are_normalized() {
        let mut tagged = new_trip(1, 1000.0, 5, 0.0);
        tagged.interests = ["food".to_string()].into_iter().collect();
        let (engine, _) = engine_with(vec![tagged, new_trip(2, 1000.0, 5, 0.9)]).await;

        let query = Query {
            budget: 1000.0,
            days: 5,
            travel_type: TravelType::Leisure,
            interests: [" Food ".to_string()].into_iter().collect(),
        };
        let set = engine.recommend(&query).await.unwrap();

        assert_eq!(set.mode, RecommendationMode::Exact);
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].trip.id, TripId(1));
    }

    #[tokio::test]
    async fn test_results_ordered_by_probability_then_popularity_then_id() {
        let (engine, store) = engine_with(vec![
            new_trip(1, 900.0, 5, 0.1),
            new_trip(2, 900.0, 5, 0.9),
            new_trip(3, 900.0, 5, 0.1),
            new_trip(4, 900.0, 5, 0.1),
        ])
        .await;

        store
            .apply_feedback(&FeedbackEvent {
                trip_id: TripId(4),
                user_id: None,
                rating: 5,
                liked: true,
                comment: None,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        let set = engine.recommend(&leisure(1000.0, 5)).await.unwrap();
        let ids: Vec<u64> = set.recommendations.iter().map(|r| r.trip.id.0).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[tokio::test]
    async fn test_empty_catalog_error() {
        let (engine, _) = engine_with(vec![]).await;
        let result = engine.recommend(&leisure(1000.0, 5)).await;
        assert!(matches!(result, Err(TripmatchError::EmptyCatalog)));
    }

    #[tokio::test]
    async fn test_invalid_query_rejected() {
        let (engine, _) = engine_with(vec![new_trip(1, 1000.0, 5, 0.0)]).await;
        let bad = Query {
            budget: -1.0,
            days: 5,
            travel_type: TravelType::Leisure,
            interests: BTreeSet::new(),
        };
        assert!(matches!(
            engine.recommend(&bad).await,
            Err(TripmatchError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_recommendation_is_a_snapshot() {
        let (engine, store) = engine_with(vec![new_trip(1, 1000.0, 5, 0.0)]).await;
        let before = engine.recommend(&leisure(1000.0, 5)).await.unwrap();

        store
            .apply_feedback(&FeedbackEvent {
                trip_id: TripId(1),
                user_id: None,
                rating: 1,
                liked: false,
                comment: None,
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        let after = engine.recommend(&leisure(1000.0, 5)).await.unwrap();
        assert_eq!(before.recommendations[0].like_probability, 0.5);
        assert!(after.recommendations[0].like_probability < 0.5);
    }

    #[tokio::test]
    async fn test_entry_lookup() {
        let (engine, _) = engine_with(vec![new_trip(3, 1000.0, 5, 0.0)]).await;
        let entry = engine.entry(TripId(3)).await.unwrap();
        assert_eq!(entry.trip.destination, "trip-3");
        assert_eq!(entry.aggregate.total(), 0);

        assert!(matches!(
            engine.entry(TripId(4)).await,
            Err(TripmatchError::UnknownTrip(TripId(4)))
        ));
        assert_eq!(engine.catalog().await.unwrap().len(), 1);
    }
}
