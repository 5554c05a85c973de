//! Relaxation planner: a finite state machine over relaxation stages.
//!
//! Stages run in a fixed order and each one is terminal unless its result set
//! is smaller than `min_results`:
//!
//! ```text
//! Exact -> BudgetRelaxed{0..B} -> DaysRelaxed{0..D} -> PopularFallback
//! ```
//!
//! Budget is always widened before days, one dimension at a time. Days
//! relaxation resets the budget tolerance to zero. The ladders are finite, so
//! a plan takes at most `1 + B + D` matcher invocations.

use crate::config::EngineConfig;
use crate::error::{Result, TripmatchError};
use crate::recommend::matcher::{self, Tolerances};
use crate::recommend::scorer::LikelihoodScorer;
use crate::storage::CatalogEntry;
use crate::types::{Query, RecommendationMode};
use tracing::debug;

/// Planner state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxationStage {
    Exact,
    BudgetRelaxed { step: usize },
    DaysRelaxed { step: usize },
    PopularFallback,
}

impl RelaxationStage {
    pub fn mode(&self) -> RecommendationMode {
        match self {
            RelaxationStage::Exact => RecommendationMode::Exact,
            RelaxationStage::BudgetRelaxed { .. } => RecommendationMode::BudgetRelaxed,
            RelaxationStage::DaysRelaxed { .. } => RecommendationMode::DaysRelaxed,
            RelaxationStage::PopularFallback => RecommendationMode::PopularFallback,
        }
    }
}

/// Result of running the planner for one query
#[derive(Debug, Clone)]
pub struct PlanOutcome<'a> {
    /// Stage that produced the result set
    pub stage: RelaxationStage,
    /// Tolerances applied; `None` for the popular fallback
    pub tolerances: Option<Tolerances>,
    /// Selected entries (catalog order, or popularity order for the fallback)
    pub entries: Vec<&'a CatalogEntry>,
    /// How many times the matcher ran
    pub matcher_invocations: usize,
    /// The fallback had to ignore travel type to find anything
    pub type_ignored: bool,
}

impl PlanOutcome<'_> {
    pub fn mode(&self) -> RecommendationMode {
        self.stage.mode()
    }
}

/// Widens query constraints until enough candidates match
#[derive(Debug, Clone)]
pub struct RelaxationPlanner {
    min_results: usize,
    budget_ladder: Vec<f64>,
    day_ladder: Vec<u32>,
}

impl RelaxationPlanner {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_results: config.min_results.max(1),
            budget_ladder: config.budget_ladder.clone(),
            day_ladder: config.day_ladder.clone(),
        }
    }

    pub fn min_results(&self) -> usize {
        self.min_results
    }

    /// Tolerances the matcher uses in `stage`; `None` for the fallback
    pub fn tolerances(&self, stage: RelaxationStage) -> Option<Tolerances> {
        match stage {
            RelaxationStage::Exact => Some(Tolerances::EXACT),
            RelaxationStage::BudgetRelaxed { step } => {
                self.budget_ladder.get(step).map(|b| Tolerances::budget(*b))
            }
            RelaxationStage::DaysRelaxed { step } => {
                self.day_ladder.get(step).map(|d| Tolerances::days(*d))
            }
            RelaxationStage::PopularFallback => None,
        }
    }

    /// Stage entered when `stage` comes up short
    pub fn next(&self, stage: RelaxationStage) -> RelaxationStage {
        match stage {
            RelaxationStage::Exact if !self.budget_ladder.is_empty() => {
                RelaxationStage::BudgetRelaxed { step: 0 }
            }
            RelaxationStage::Exact => self.first_days_stage(),
            RelaxationStage::BudgetRelaxed { step } if step + 1 < self.budget_ladder.len() => {
                RelaxationStage::BudgetRelaxed { step: step + 1 }
            }
            RelaxationStage::BudgetRelaxed { .. } => self.first_days_stage(),
            RelaxationStage::DaysRelaxed { step } if step + 1 < self.day_ladder.len() => {
                RelaxationStage::DaysRelaxed { step: step + 1 }
            }
            RelaxationStage::DaysRelaxed { .. } | RelaxationStage::PopularFallback => {
                RelaxationStage::PopularFallback
            }
        }
    }

    fn first_days_stage(&self) -> RelaxationStage {
        if self.day_ladder.is_empty() {
            RelaxationStage::PopularFallback
        } else {
            RelaxationStage::DaysRelaxed { step: 0 }
        }
    }

    /// Run the state machine over `entries`
    ///
    /// Fails with `EmptyCatalog` only when `entries` is empty.
    pub fn plan<'a>(
        &self,
        query: &Query,
        entries: &'a [CatalogEntry],
        scorer: &LikelihoodScorer,
    ) -> Result<PlanOutcome<'a>> {
        let mut stage = RelaxationStage::Exact;
        let mut matcher_invocations = 0;

        while let Some(tolerances) = self.tolerances(stage) {
            let hits = matcher::filter(query, entries, tolerances);
            matcher_invocations += 1;

            debug!(
                "Stage {:?} (budget +{:.0}%, days ±{}): {} candidate(s)",
                stage,
                tolerances.budget * 100.0,
                tolerances.days,
                hits.len()
            );

            if hits.len() >= self.min_results {
                return Ok(PlanOutcome {
                    stage,
                    tolerances: Some(tolerances),
                    entries: hits,
                    matcher_invocations,
                    type_ignored: false,
                });
            }

            stage = self.next(stage);
        }

        self.popular_fallback(query, entries, scorer, matcher_invocations)
    }

    fn popular_fallback<'a>(
        &self,
        query: &Query,
        entries: &'a [CatalogEntry],
        scorer: &LikelihoodScorer,
        matcher_invocations: usize,
    ) -> Result<PlanOutcome<'a>> {
        if entries.is_empty() {
            return Err(TripmatchError::EmptyCatalog);
        }

        let mut pool: Vec<&CatalogEntry> = entries
            .iter()
            .filter(|e| e.trip.travel_type == query.travel_type)
            .collect();
        let type_ignored = pool.is_empty();
        if type_ignored {
            debug!(
                "No {} trips in catalog, falling back across all travel types",
                query.travel_type
            );
            pool = entries.iter().collect();
        }

        pool.sort_by(|a, b| {
            b.trip
                .base_popularity
                .total_cmp(&a.trip.base_popularity)
                .then_with(|| {
                    scorer
                        .like_probability(&b.aggregate)
                        .total_cmp(&scorer.like_probability(&a.aggregate))
                })
                .then_with(|| a.trip.id.cmp(&b.trip.id))
        });
        pool.truncate(self.min_results);

        Ok(PlanOutcome {
            stage: RelaxationStage::PopularFallback,
            tolerances: None,
            entries: pool,
            matcher_invocations,
            type_ignored,
        })
    }
}

impl Default for RelaxationPlanner {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{interest_set, FeedbackAggregate, TravelType, TripCandidate, TripId};

    fn entry(id: u64, budget: f64, days: u32, travel_type: TravelType, popularity: f64) -> CatalogEntry {
        CatalogEntry {
            trip: TripCandidate {
                id: TripId(id),
                destination: format!("trip-{}", id),
                budget,
                days,
                travel_type,
                interests: interest_set(["sightseeing"]),
                base_popularity: popularity,
                itinerary: vec![],
            },
            aggregate: FeedbackAggregate::default(),
        }
    }

    fn leisure(budget: f64, days: u32) -> Query {
        Query::new(budget, days, TravelType::Leisure, Vec::<String>::new()).unwrap()
    }

    #[test]
    fn test_stage_sequence_with_default_ladders() {
        let planner = RelaxationPlanner::default();
        let mut stage = RelaxationStage::Exact;
        let mut seen = vec![stage];
        while stage != RelaxationStage::PopularFallback {
            stage = planner.next(stage);
            seen.push(stage);
        }

        assert_eq!(
            seen,
            vec![
                RelaxationStage::Exact,
                RelaxationStage::BudgetRelaxed { step: 0 },
                RelaxationStage::BudgetRelaxed { step: 1 },
                RelaxationStage::BudgetRelaxed { step: 2 },
                RelaxationStage::DaysRelaxed { step: 0 },
                RelaxationStage::DaysRelaxed { step: 1 },
                RelaxationStage::DaysRelaxed { step: 2 },
                RelaxationStage::PopularFallback,
            ]
        );
    }

    #[test]
    fn test_empty_ladders_skip_straight_to_fallback() {
        let planner = RelaxationPlanner::new(&EngineConfig {
            min_results: 1,
            budget_ladder: vec![],
            day_ladder: vec![],
        });
        assert_eq!(
            planner.next(RelaxationStage::Exact),
            RelaxationStage::PopularFallback
        );
    }

    #[test]
    fn test_exact_stops_immediately() {
        let planner = RelaxationPlanner::default();
        let entries = vec![entry(1, 1000.0, 5, TravelType::Leisure, 0.0)];
        let outcome = planner
            .plan(&leisure(1000.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();

        assert_eq!(outcome.mode(), RecommendationMode::Exact);
        assert_eq!(outcome.matcher_invocations, 1);
        assert_eq!(outcome.entries.len(), 1);
    }

    #[test]
    fn test_budget_relaxed_before_days() {
        // One trip 15% over budget, one trip a day longer: budget wins.
        let planner = RelaxationPlanner::default();
        let entries = vec![
            entry(1, 1150.0, 5, TravelType::Leisure, 0.0),
            entry(2, 900.0, 6, TravelType::Leisure, 0.0),
        ];
        let outcome = planner
            .plan(&leisure(1000.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();

        assert_eq!(outcome.stage, RelaxationStage::BudgetRelaxed { step: 1 });
        assert_eq!(outcome.tolerances, Some(Tolerances::budget(0.20)));
        assert_eq!(outcome.entries[0].trip.id, TripId(1));
        assert_eq!(outcome.matcher_invocations, 3);
    }

    #[test]
    fn test_candidate_on_ladder_step_stops_at_that_step() {
        let planner = RelaxationPlanner::default();
        let entries = vec![entry(1, 3.6, 5, TravelType::Leisure, 0.0)];
        let outcome = planner
            .plan(&leisure(3.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();

        assert_eq!(outcome.stage, RelaxationStage::BudgetRelaxed { step: 1 });

        let single_step = RelaxationPlanner::new(&EngineConfig {
            min_results: 1,
            budget_ladder: vec![0.20],
            day_ladder: vec![],
        });
        let outcome = single_step
            .plan(&leisure(3.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();
        assert_eq!(outcome.mode(), RecommendationMode::BudgetRelaxed);
    }

    #[test]
    fn test_days_relaxed_resets_budget_tolerance() {
        // 40% over budget is out of reach of the budget ladder, and days
        // relaxation does not carry budget tolerance with it.
        let planner = RelaxationPlanner::default();
        let entries = vec![
            entry(1, 1400.0, 5, TravelType::Leisure, 0.0),
            entry(2, 1050.0, 7, TravelType::Leisure, 0.0),
            entry(3, 900.0, 7, TravelType::Leisure, 0.0),
        ];
        let outcome = planner
            .plan(&leisure(1000.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();

        assert_eq!(outcome.stage, RelaxationStage::DaysRelaxed { step: 1 });
        let ids: Vec<TripId> = outcome.entries.iter().map(|e| e.trip.id).collect();
        assert_eq!(ids, vec![TripId(3)]);
        assert_eq!(outcome.matcher_invocations, 6);
    }

    #[test]
    fn test_fallback_ranks_by_popularity_within_type() {
        let planner = RelaxationPlanner::new(&EngineConfig {
            min_results: 2,
            ..EngineConfig::default()
        });
        let entries = vec![
            entry(1, 9000.0, 20, TravelType::Leisure, 0.2),
            entry(2, 9000.0, 20, TravelType::Leisure, 0.9),
            entry(3, 9000.0, 20, TravelType::Leisure, 0.5),
            entry(4, 100.0, 5, TravelType::Adventure, 1.0),
        ];
        let outcome = planner
            .plan(&leisure(1000.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();

        assert_eq!(outcome.mode(), RecommendationMode::PopularFallback);
        assert!(!outcome.type_ignored);
        let ids: Vec<u64> = outcome.entries.iter().map(|e| e.trip.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(outcome.matcher_invocations, 7);
    }

    #[test]
    fn test_fallback_ignores_type_when_nothing_of_that_type_exists() {
        let planner = RelaxationPlanner::default();
        let entries = vec![entry(1, 1000.0, 5, TravelType::Leisure, 0.0)];
        let query = Query::new(1000.0, 5, TravelType::Adventure, Vec::<String>::new()).unwrap();

        let outcome = planner
            .plan(&query, &entries, &LikelihoodScorer::default())
            .unwrap();
        assert_eq!(outcome.mode(), RecommendationMode::PopularFallback);
        assert!(outcome.type_ignored);
        assert_eq!(outcome.entries[0].trip.id, TripId(1));
    }

    #[test]
    fn test_fallback_breaks_popularity_ties_by_like_probability() {
        let planner = RelaxationPlanner::default();
        let mut liked = entry(2, 9000.0, 30, TravelType::Leisure, 0.5);
        liked.aggregate.apply(true, 5);
        let entries = vec![entry(1, 9000.0, 30, TravelType::Leisure, 0.5), liked];

        let outcome = planner
            .plan(&leisure(1000.0, 5), &entries, &LikelihoodScorer::default())
            .unwrap();
        assert_eq!(outcome.entries[0].trip.id, TripId(2));
    }

    #[test]
    fn test_empty_catalog_fails() {
        let planner = RelaxationPlanner::default();
        let result = planner.plan(&leisure(1000.0, 5), &[], &LikelihoodScorer::default());
        assert!(matches!(result, Err(TripmatchError::EmptyCatalog)));
    }
}
