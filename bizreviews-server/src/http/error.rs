//! API error types with IntoResponse
//!
//! Errors are converted to `{"Error": "<message>"}` bodies with the
//! matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// Message for a second review of the same business by the same user
pub const DUPLICATE_REVIEW_MESSAGE: &str = "You have already submitted a review for this business. \
     You can update your previous review, or delete it and submit a new review";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad body or query (400)
    Validation(ValidationError),

    /// Resource or lookup result absent (404)
    NotFound { message: &'static str },

    /// Path did not name an integer id (404)
    NoRoute,

    /// Route exists but not for this method (405)
    MethodNotAllowed,

    /// Duplicate review (409)
    Conflict { message: &'static str },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::NoRoute => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { message } | Self::Conflict { message } => (*message).to_string(),
            Self::NoRoute => "Not Found".to_string(),
            Self::MethodNotAllowed => "Method Not Allowed".to_string(),
            Self::Database(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Database(e) = &self {
            // Log the actual error, return generic message
            tracing::error!(error = ?e, "Database error: {}", e);
        }

        (self.status(), Json(json!({ "Error": self.message() }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, .. } => Self::NotFound {
                message: resource.not_found_message(),
            },
            DbError::DuplicateReview { .. } => Self::Conflict {
                message: DUPLICATE_REVIEW_MESSAGE,
            },
            DbError::Sqlx(_) => Self::Database(e),
        }
    }
}
