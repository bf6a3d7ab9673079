//! Typed error-to-response mapping for the REST handlers.
//!
//! All responses use the `{ "success": false, "message": ... }` envelope.
//! Server faults are logged here and surfaced as opaque 500s.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domains::bids::PlaceBidError;
use crate::domains::hiring::HireError;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "message": self.message })),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::internal()
    }
}

impl From<HireError> for ApiError {
    fn from(err: HireError) -> Self {
        match err {
            HireError::NotFound => Self::not_found(err.to_string()),
            HireError::Unauthorized => Self::unauthorized(err.to_string()),
            HireError::Conflict => Self::conflict(err.to_string()),
            // Already logged at the coordinator boundary.
            HireError::InvariantViolation(_) => Self::internal(),
            HireError::Store(e) => {
                tracing::error!(error = %e, "hire store failure");
                Self::internal()
            }
        }
    }
}

impl From<PlaceBidError> for ApiError {
    fn from(err: PlaceBidError) -> Self {
        match err {
            PlaceBidError::GigNotFound => Self::not_found(err.to_string()),
            PlaceBidError::GigNotOpen | PlaceBidError::OwnGig | PlaceBidError::AlreadyBid => {
                Self::bad_request(err.to_string())
            }
            PlaceBidError::Store(e) => {
                tracing::error!(error = %e, "bid store failure");
                Self::internal()
            }
        }
    }
}
