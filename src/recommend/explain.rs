//! Structured reasons attached to each recommendation.

use crate::recommend::planner::RelaxationStage;
use crate::recommend::scorer::Score;
use crate::types::{MatchReason, Query, TripCandidate};

/// Like probability at which a well-sampled trip counts as well liked
const WELL_LIKED_PROBABILITY: f64 = 0.7;

/// Explain why `trip` was selected for `query` at `stage`
pub fn reasons_for(
    query: &Query,
    trip: &TripCandidate,
    stage: RelaxationStage,
    score: &Score,
    samples: u64,
    min_samples: u64,
) -> Vec<MatchReason> {
    let mut reasons = Vec::new();

    if stage == RelaxationStage::PopularFallback {
        reasons.push(MatchReason::PopularChoice);
        if trip.travel_type != query.travel_type {
            reasons.push(MatchReason::TypeMismatch);
        }
    } else {
        let over_budget = trip.budget > query.budget;
        let difference = trip.days.abs_diff(query.days);

        if over_budget {
            reasons.push(MatchReason::BudgetStretched {
                over_budget: (trip.budget - query.budget) / query.budget,
            });
        }
        if difference > 0 {
            reasons.push(MatchReason::DaysAdjusted { difference });
        }
        if !over_budget && difference == 0 {
            reasons.push(MatchReason::ExactMatch);
        }
    }

    let shared: Vec<String> = query
        .interests
        .intersection(&trip.interests)
        .cloned()
        .collect();
    if !shared.is_empty() {
        reasons.push(MatchReason::SharedInterests { tags: shared });
    }

    if samples >= min_samples.max(1) && score.like_probability >= WELL_LIKED_PROBABILITY {
        reasons.push(MatchReason::WellLiked);
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{interest_set, Confidence, TravelType, TripId};

    fn trip(budget: f64, days: u32, travel_type: TravelType) -> TripCandidate {
        TripCandidate {
            id: TripId(1),
            destination: "Goa".to_string(),
            budget,
            days,
            travel_type,
            interests: interest_set(["beach", "food"]),
            base_popularity: 0.5,
            itinerary: vec![],
        }
    }

    fn neutral() -> Score {
        Score {
            like_probability: 0.5,
            confidence: Confidence::Low,
        }
    }

    #[test]
    fn test_exact_match_reason() {
        let query = Query::new(1000.0, 5, TravelType::Leisure, ["food"]).unwrap();
        let reasons = reasons_for(
            &query,
            &trip(900.0, 5, TravelType::Leisure),
            RelaxationStage::Exact,
            &neutral(),
            0,
            5,
        );
        assert_eq!(
            reasons,
            vec![
                MatchReason::ExactMatch,
                MatchReason::SharedInterests {
                    tags: vec!["food".to_string()]
                }
            ]
        );
    }

    #[test]
    fn test_relaxed_reasons_report_actual_deviation() {
        let query = Query::new(1000.0, 5, TravelType::Leisure, Vec::<String>::new()).unwrap();

        let reasons = reasons_for(
            &query,
            &trip(1150.0, 5, TravelType::Leisure),
            RelaxationStage::BudgetRelaxed { step: 1 },
            &neutral(),
            0,
            5,
        );
        match &reasons[0] {
            MatchReason::BudgetStretched { over_budget } => {
                assert!((over_budget - 0.15).abs() < 1e-9)
            }
            other => panic!("unexpected reason {:?}", other),
        }

        let reasons = reasons_for(
            &query,
            &trip(800.0, 7, TravelType::Leisure),
            RelaxationStage::DaysRelaxed { step: 1 },
            &neutral(),
            0,
            5,
        );
        assert_eq!(reasons, vec![MatchReason::DaysAdjusted { difference: 2 }]);
    }

    #[test]
    fn test_fallback_reasons() {
        let query = Query::new(1000.0, 5, TravelType::Adventure, Vec::<String>::new()).unwrap();
        let reasons = reasons_for(
            &query,
            &trip(5000.0, 12, TravelType::Leisure),
            RelaxationStage::PopularFallback,
            &neutral(),
            0,
            5,
        );
        assert_eq!(
            reasons,
            vec![MatchReason::PopularChoice, MatchReason::TypeMismatch]
        );
    }

    #[test]
    fn test_well_liked_needs_enough_samples() {
        let query = Query::new(1000.0, 5, TravelType::Leisure, Vec::<String>::new()).unwrap();
        let liked = Score {
            like_probability: 0.8,
            confidence: Confidence::Medium,
        };
        let t = trip(900.0, 5, TravelType::Leisure);

        let few = reasons_for(&query, &t, RelaxationStage::Exact, &liked, 2, 5);
        assert!(!few.contains(&MatchReason::WellLiked));

        let many = reasons_for(&query, &t, RelaxationStage::Exact, &liked, 8, 5);
        assert!(many.contains(&MatchReason::WellLiked));
    }
}
