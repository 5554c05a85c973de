//! Request and response bodies for the HTTP API
//!
//! Requests are parsed leniently: browser forms send numbers as strings and
//! booleans as `1`/`0`. Everything is normalized into the core types before
//! it reaches the engine or the ledger.

use crate::error::{Result, TripmatchError};
use crate::feedback::FeedbackAck;
use crate::recommend::scorer::Score;
use crate::storage::CatalogEntry;
use crate::types::{
    Confidence, FeedbackAggregate, FeedbackEvent, FeedbackSubmission, ItineraryDay, MatchReason,
    Query, Recommendation, RecommendationMode, RecommendationSet, TravelType, TripCandidate,
    TripId,
};
use serde::{Deserialize, Serialize};

/// A JSON number, or a string holding one
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn to_f64(&self, field: &str) -> Result<f64> {
        let value = match self {
            NumberOrString::Number(n) => *n,
            NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                TripmatchError::Validation(format!("{} must be a number, got '{}'", field, s))
            })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(TripmatchError::Validation(format!(
                "{} must be a finite number",
                field
            )))
        }
    }

    /// Integral values outside the `i64` range saturate, so range checks
    /// further in still see them as out of range rather than malformed.
    fn to_integer(&self, field: &str) -> Result<i64> {
        let value = self.to_f64(field)?;
        if value.fract() != 0.0 {
            return Err(TripmatchError::Validation(format!(
                "{} must be an integer, got {}",
                field, value
            )));
        }
        Ok(value as i64)
    }
}

/// A boolean, `0`/`1`, or one of "true"/"false"/"yes"/"no"
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoolLike {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl BoolLike {
    fn to_bool(&self) -> Result<bool> {
        match self {
            BoolLike::Bool(b) => Ok(*b),
            BoolLike::Int(0) => Ok(false),
            BoolLike::Int(1) => Ok(true),
            BoolLike::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(TripmatchError::Validation(format!(
                    "liked must be a boolean, got '{}'",
                    s
                ))),
            },
            BoolLike::Int(other) => Err(TripmatchError::Validation(format!(
                "liked must be a boolean, got {}",
                other
            ))),
        }
    }
}

/// A user or trip identifier sent as a number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(u64),
    Text(String),
}

impl IdValue {
    fn into_text(self) -> String {
        match self {
            IdValue::Number(n) => n.to_string(),
            IdValue::Text(s) => s,
        }
    }

    fn to_trip_id(&self) -> Result<TripId> {
        let id = match self {
            IdValue::Number(n) => *n,
            IdValue::Text(s) => s.trim().parse::<u64>().map_err(|_| {
                TripmatchError::Validation(format!("trip_id must be a positive integer, got '{}'", s))
            })?,
        };
        Ok(TripId(id))
    }
}

/// Interests as a list of tags, or one comma-separated string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Interests {
    List(Vec<String>),
    Text(String),
}

impl Default for Interests {
    fn default() -> Self {
        Interests::List(Vec::new())
    }
}

impl Interests {
    fn into_tags(self) -> Vec<String> {
        match self {
            Interests::List(tags) => tags,
            Interests::Text(s) => s.split(',').map(str::to_string).collect(),
        }
    }
}

/// Body of `POST /recommendations`
///
/// Unknown fields (the front-end also sends `destination`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    pub budget: Option<NumberOrString>,
    pub days: Option<NumberOrString>,
    pub travel_type: Option<String>,
    #[serde(default)]
    pub interests: Option<Interests>,
}

impl RecommendationRequest {
    pub fn into_query(self) -> Result<Query> {
        let budget = self
            .budget
            .ok_or_else(|| TripmatchError::Validation("budget is required".to_string()))?
            .to_f64("budget")?;

        let days = self
            .days
            .ok_or_else(|| TripmatchError::Validation("days is required".to_string()))?
            .to_integer("days")?;
        let days = u32::try_from(days).map_err(|_| {
            TripmatchError::Validation(format!("days must be a positive integer, got {}", days))
        })?;

        let travel_type: TravelType = self.travel_type.unwrap_or_default().parse()?;
        let interests = self.interests.unwrap_or_default().into_tags();

        Query::new(budget, days, travel_type, interests)
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackRequest {
    pub trip_id: Option<IdValue>,
    pub user_id: Option<IdValue>,
    pub rating: Option<NumberOrString>,
    pub liked: Option<BoolLike>,
    pub comment: Option<String>,
}

impl FeedbackRequest {
    pub fn into_submission(self) -> Result<FeedbackSubmission> {
        let trip_id = self
            .trip_id
            .ok_or_else(|| TripmatchError::Validation("trip_id is required".to_string()))?
            .to_trip_id()?;
        let rating = self
            .rating
            .ok_or_else(|| TripmatchError::Validation("rating is required".to_string()))?
            .to_integer("rating")?;
        let liked = self
            .liked
            .ok_or_else(|| TripmatchError::Validation("liked is required".to_string()))?
            .to_bool()?;

        Ok(FeedbackSubmission {
            trip_id,
            user_id: self.user_id.map(IdValue::into_text),
            rating,
            liked,
            comment: self.comment,
        })
    }
}

/// One ranked recommendation as rendered on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub trip_id: TripId,
    pub destination: String,
    pub budget: f64,
    pub days: u32,
    pub travel_type: TravelType,
    pub like_probability: f64,
    pub confidence: Confidence,
    pub interests: Vec<String>,
    pub average_rating: Option<f64>,
    pub reasons: Vec<MatchReason>,
    pub itinerary: Vec<ItineraryDay>,
}

impl From<Recommendation> for RecommendationView {
    fn from(rec: Recommendation) -> Self {
        Self {
            trip_id: rec.trip.id,
            destination: rec.trip.destination,
            budget: rec.trip.budget,
            days: rec.trip.days,
            travel_type: rec.trip.travel_type,
            like_probability: rec.like_probability,
            confidence: rec.confidence,
            interests: rec.trip.interests.into_iter().collect(),
            average_rating: rec.average_rating,
            reasons: rec.reasons,
            itinerary: rec.trip.itinerary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub mode: RecommendationMode,
    pub recommendations: Vec<RecommendationView>,
}

impl From<RecommendationSet> for RecommendationsResponse {
    fn from(set: RecommendationSet) -> Self {
        Self {
            mode: set.mode,
            recommendations: set.recommendations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub trip_id: TripId,
    pub like_probability: f64,
    pub confidence: Confidence,
    pub average_rating: Option<f64>,
    pub aggregate: FeedbackAggregate,
}

impl From<FeedbackAck> for FeedbackResponse {
    fn from(ack: FeedbackAck) -> Self {
        Self {
            success: true,
            message: "Feedback recorded".to_string(),
            trip_id: ack.trip_id,
            like_probability: ack.like_probability,
            confidence: ack.confidence,
            average_rating: ack.average_rating,
            aggregate: ack.aggregate,
        }
    }
}

/// A catalog trip with its current standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripView {
    #[serde(flatten)]
    pub trip: TripCandidate,
    pub aggregate: FeedbackAggregate,
    pub like_probability: f64,
    pub confidence: Confidence,
    pub average_rating: Option<f64>,
}

impl TripView {
    pub fn new(entry: CatalogEntry, score: Score) -> Self {
        Self {
            average_rating: entry.aggregate.average_rating(),
            trip: entry.trip,
            aggregate: entry.aggregate,
            like_probability: score.like_probability,
            confidence: score.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetail {
    #[serde(flatten)]
    pub view: TripView,
    pub recent_feedback: Vec<FeedbackEvent>,
}
