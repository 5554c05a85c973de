//! HTTP API for recommendations and feedback
//!
//! Provides:
//! - `POST /recommendations` (alias `POST /generate-plan`)
//! - `POST /feedback`
//! - Read-only catalog inspection (`GET /trips`, `GET /trips/:id`)
//! - Health check

pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
