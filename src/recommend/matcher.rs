//! Constraint matching between a query and catalog candidates.

use crate::storage::CatalogEntry;
use crate::types::{Query, TripCandidate};
use serde::{Deserialize, Serialize};

/// How far a candidate may stray from the query and still match
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Fraction over the requested budget (0.1 = 10% over)
    pub budget: f64,
    /// Days either side of the requested duration
    pub days: u32,
}

impl Tolerances {
    pub const EXACT: Tolerances = Tolerances { budget: 0.0, days: 0 };

    pub fn budget(budget: f64) -> Self {
        Self { budget, days: 0 }
    }

    pub fn days(days: u32) -> Self {
        Self { budget: 0.0, days }
    }
}

/// Whether `candidate` satisfies `query` under `tolerances`
///
/// Travel type must be equal; it is never relaxed.
pub fn matches(query: &Query, candidate: &TripCandidate, tolerances: Tolerances) -> bool {
    if candidate.travel_type != query.travel_type {
        return false;
    }

    if candidate.budget > budget_limit(query.budget, tolerances.budget) {
        return false;
    }

    if candidate.days.abs_diff(query.days) > tolerances.days {
        return false;
    }

    query.interests.is_empty() || !query.interests.is_disjoint(&candidate.interests)
}

/// Highest budget accepted at `tolerance`
///
/// Carries a relative slack of [`BUDGET_EPSILON`] so a candidate sitting
/// exactly on a ladder step (3.0 at +20% is 3.6) is not lost to rounding.
fn budget_limit(budget: f64, tolerance: f64) -> f64 {
    let limit = budget * (1.0 + tolerance);
    limit + limit * BUDGET_EPSILON
}

const BUDGET_EPSILON: f64 = 1e-9;

/// Catalog entries matching `query`, in catalog order
pub fn filter<'a>(
    query: &Query,
    entries: &'a [CatalogEntry],
    tolerances: Tolerances,
) -> Vec<&'a CatalogEntry> {
    entries
        .iter()
        .filter(|entry| matches(query, &entry.trip, tolerances))
        .collect()
}
