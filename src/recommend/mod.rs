//! Recommendation pipeline.
//!
//! A query flows through four stages:
//!
//! - **Matcher**: pure predicate deciding whether a trip fits a query under
//!   given budget/day tolerances
//! - **Planner**: walks the relaxation ladder (exact → budget → days →
//!   popular fallback) until enough trips match
//! - **Scorer**: turns a trip's feedback aggregate into a smoothed like
//!   probability and a confidence label
//! - **Engine**: ties the above to a [`CatalogStore`](crate::storage::CatalogStore)
//!   snapshot and produces the final ranked list with reasons

pub mod engine;
pub mod explain;
pub mod matcher;
pub mod planner;
pub mod scorer;

pub use engine::RecommendationEngine;
pub use matcher::Tolerances;
pub use planner::{PlanOutcome, RelaxationPlanner, RelaxationStage};
pub use scorer::{LikelihoodScorer, Score};
