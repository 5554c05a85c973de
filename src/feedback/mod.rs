//! Feedback intake.
//!
//! Every accepted submission becomes one append-only [`FeedbackEvent`] and
//! increments the trip's [`FeedbackAggregate`] in the same atomic store
//! operation. Repeat feedback from the same user accumulates.
//!
//! [`FeedbackEvent`]: crate::types::FeedbackEvent
//! [`FeedbackAggregate`]: crate::types::FeedbackAggregate

pub mod ledger;

pub use ledger::{FeedbackAck, FeedbackLedger, MAX_RATING, MIN_RATING};
