//! Core data types for the tripmatch recommendation engine
//!
//! Trip candidates, their feedback aggregates, feedback events, queries and
//! the recommendations produced for them. Everything that crosses the store,
//! engine and API boundaries is defined here.

use crate::error::{Result, TripmatchError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Stable identifier of a trip candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub u64);

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of trip. Never relaxed during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelType {
    Leisure,
    Adventure,
    Family,
    Business,
    Cultural,
    Romantic,
}

impl TravelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Leisure => "leisure",
            TravelType::Adventure => "adventure",
            TravelType::Family => "family",
            TravelType::Business => "business",
            TravelType::Cultural => "cultural",
            TravelType::Romantic => "romantic",
        }
    }
}

impl std::fmt::Display for TravelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelType {
    type Err = TripmatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leisure" => Ok(TravelType::Leisure),
            "adventure" => Ok(TravelType::Adventure),
            "family" => Ok(TravelType::Family),
            "business" => Ok(TravelType::Business),
            "cultural" => Ok(TravelType::Cultural),
            "romantic" => Ok(TravelType::Romantic),
            "" => Err(TripmatchError::Validation(
                "travel_type is required".to_string(),
            )),
            other => Err(TripmatchError::Validation(format!(
                "unknown travel_type '{}'",
                other
            ))),
        }
    }
}

// Accepts any casing ("Leisure", "ADVENTURE") as submitted by HTML forms.
impl<'de> Deserialize<'de> for TravelType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Normalize an interest tag: trimmed, lowercase. Empty tags are dropped.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Build a normalized interest set from raw tags
pub fn interest_set<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .collect()
}

/// One day of a trip's static itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    #[serde(default)]
    pub morning: String,
    #[serde(default)]
    pub afternoon: String,
    #[serde(default)]
    pub evening: String,
}

/// A pre-existing trip record eligible for recommendation
///
/// Immutable once ingested. Its feedback aggregate lives separately in the
/// store and is the only thing that changes over its lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCandidate {
    pub id: TripId,
    pub destination: String,
    pub budget: f64,
    pub days: u32,
    pub travel_type: TravelType,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub base_popularity: f64,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
}

/// A trip as submitted for ingest; the store assigns an id when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
    #[serde(default)]
    pub id: Option<TripId>,
    pub destination: String,
    pub budget: f64,
    pub days: u32,
    pub travel_type: TravelType,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub base_popularity: f64,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
}

impl NewTrip {
    /// Check ingest invariants and normalize interest tags
    pub fn validate(mut self) -> Result<Self> {
        if self.destination.trim().is_empty() {
            return Err(TripmatchError::Validation(
                "trip destination must not be empty".to_string(),
            ));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(TripmatchError::Validation(format!(
                "trip budget must be positive, got {}",
                self.budget
            )));
        }
        if self.days == 0 {
            return Err(TripmatchError::Validation(
                "trip days must be positive".to_string(),
            ));
        }
        if !self.base_popularity.is_finite() || self.base_popularity < 0.0 {
            return Err(TripmatchError::Validation(format!(
                "base_popularity must be non-negative, got {}",
                self.base_popularity
            )));
        }
        if let Some(TripId(0)) = self.id {
            return Err(TripmatchError::Validation(
                "trip id must be positive".to_string(),
            ));
        }
        self.interests = interest_set(&self.interests);
        Ok(self)
    }

    /// Attach the id assigned by the store
    pub fn into_candidate(self, id: TripId) -> TripCandidate {
        TripCandidate {
            id,
            destination: self.destination,
            budget: self.budget,
            days: self.days,
            travel_type: self.travel_type,
            interests: self.interests,
            base_popularity: self.base_popularity,
            itinerary: self.itinerary,
        }
    }
}

/// Running tally of feedback for one trip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAggregate {
    pub like_count: u64,
    pub dislike_count: u64,
    pub rating_sum: u64,
    pub rating_count: u64,
}

impl FeedbackAggregate {
    /// Fold one feedback event into the tally
    pub fn apply(&mut self, liked: bool, rating: u8) {
        if liked {
            self.like_count += 1;
        } else {
            self.dislike_count += 1;
        }
        self.rating_sum += u64::from(rating);
        self.rating_count += 1;
    }

    /// Total like/dislike votes
    pub fn total(&self) -> u64 {
        self.like_count + self.dislike_count
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.rating_count == 0 {
            None
        } else {
            Some(self.rating_sum as f64 / self.rating_count as f64)
        }
    }
}

/// Feedback as submitted by a caller, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub trip_id: TripId,
    #[serde(default)]
    pub user_id: Option<String>,
    pub rating: i64,
    pub liked: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

/// An accepted, timestamped feedback event. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub trip_id: TripId,
    pub user_id: Option<String>,
    pub rating: u8,
    pub liked: bool,
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Trip constraints supplied by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub budget: f64,
    pub days: u32,
    pub travel_type: TravelType,
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

impl Query {
    /// Build a validated query
    pub fn new<I, S>(budget: f64, days: u32, travel_type: TravelType, interests: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let query = Self {
            budget,
            days,
            travel_type,
            interests: interest_set(interests),
        };
        query.validate()?;
        Ok(query)
    }

    /// Validated copy with interest tags trimmed and lowercased
    ///
    /// Queries built field by field or deserialized directly skip
    /// [`Query::new`]; the engine runs every query through this first.
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        Ok(Self {
            interests: interest_set(&self.interests),
            ..self.clone()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(TripmatchError::Validation(format!(
                "budget must be a positive number, got {}",
                self.budget
            )));
        }
        if self.days == 0 {
            return Err(TripmatchError::Validation(
                "days must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which planner stage produced a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    Exact,
    BudgetRelaxed,
    DaysRelaxed,
    PopularFallback,
}

impl std::fmt::Display for RecommendationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationMode::Exact => write!(f, "exact"),
            RecommendationMode::BudgetRelaxed => write!(f, "budget_relaxed"),
            RecommendationMode::DaysRelaxed => write!(f, "days_relaxed"),
            RecommendationMode::PopularFallback => write!(f, "popular_fallback"),
        }
    }
}

/// How much feedback backs a like probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Machine-readable reason a trip was recommended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchReason {
    /// Budget and duration fit without any relaxation
    ExactMatch,
    /// Trip costs more than asked; fraction over the requested budget
    BudgetStretched { over_budget: f64 },
    /// Trip length differs from the request by this many days
    DaysAdjusted { difference: u32 },
    /// Interests shared with the request
    SharedInterests { tags: Vec<String> },
    /// Feedback shows travellers liked this trip
    WellLiked,
    /// Chosen by popularity because nothing matched the constraints
    PopularChoice,
    /// Popular fallback had to ignore the requested travel type
    TypeMismatch,
}

/// One scored trip in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub trip: TripCandidate,
    pub like_probability: f64,
    pub confidence: Confidence,
    pub mode: RecommendationMode,
    pub average_rating: Option<f64>,
    pub reasons: Vec<MatchReason>,
}

/// Ordered recommendations plus the stage that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub mode: RecommendationMode,
    pub recommendations: Vec<Recommendation>,
}
