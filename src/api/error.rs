//! Mapping from library errors to HTTP responses

use crate::error::TripmatchError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(pub TripmatchError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TripmatchError::Validation(_) => StatusCode::BAD_REQUEST,
            TripmatchError::InvalidRating(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TripmatchError::UnknownTrip(_) | TripmatchError::EmptyCatalog => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match &self.0 {
            TripmatchError::Validation(_) => "validation_error",
            TripmatchError::InvalidRating(_) => "invalid_rating",
            TripmatchError::UnknownTrip(_) => "unknown_trip",
            TripmatchError::EmptyCatalog => "empty_catalog",
            TripmatchError::Database(_) => "store_error",
            _ => "internal_error",
        }
    }
}

impl From<TripmatchError> for ApiError {
    fn from(err: TripmatchError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(TripmatchError::Validation(format!(
            "malformed request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(TripmatchError::Validation(format!(
            "invalid path: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self.0);
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
