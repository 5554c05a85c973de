//! Like-probability scoring from feedback aggregates.
//!
//! Uses additive smoothing over like/dislike counts:
//!
//! ```text
//! p = (likes + α) / (likes + dislikes + 2α)
//! ```
//!
//! With no feedback this is exactly 0.5 for any α, so cold-start trips get a
//! neutral prior instead of a degenerate 0 or 1. Confidence is a step
//! function of feedback volume.

use crate::config::ScoringConfig;
use crate::types::{Confidence, FeedbackAggregate};
use serde::{Deserialize, Serialize};

/// Score for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub like_probability: f64,
    pub confidence: Confidence,
}

/// Stateless scorer; reads aggregates, never mutates them
#[derive(Debug, Clone)]
pub struct LikelihoodScorer {
    alpha: f64,
    low_threshold: u64,
    high_threshold: u64,
}

impl LikelihoodScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            alpha: config.smoothing_alpha,
            low_threshold: config.low_threshold,
            high_threshold: config.high_threshold,
        }
    }

    pub fn score(&self, aggregate: &FeedbackAggregate) -> Score {
        Score {
            like_probability: self.like_probability(aggregate),
            confidence: self.confidence(aggregate),
        }
    }

    pub fn like_probability(&self, aggregate: &FeedbackAggregate) -> f64 {
        let likes = aggregate.like_count as f64;
        let total = aggregate.total() as f64;
        let p = (likes + self.alpha) / (total + 2.0 * self.alpha);

        if !p.is_finite() {
            return 0.5;
        }
        p.clamp(0.0, 1.0)
    }

    pub fn confidence(&self, aggregate: &FeedbackAggregate) -> Confidence {
        let samples = aggregate.total();
        if samples < self.low_threshold {
            Confidence::Low
        } else if samples < self.high_threshold {
            Confidence::Medium
        } else {
            Confidence::High
        }
    }

    /// Feedback volume needed before a score counts as more than a prior
    pub fn low_threshold(&self) -> u64 {
        self.low_threshold
    }
}

impl Default for LikelihoodScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
