use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thermal_simulator::SimulatorError;
use thiserror::Error;

/// Top-level API error shared by all route handlers.
///
/// Handler panics never reach this type; they are turned into a generic 500
/// by the panic layer in [`crate::app`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("validation error")]
    Validation(serde_json::Value),
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, payload) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::Validation(payload) => (StatusCode::BAD_REQUEST, payload),
            ApiError::Simulator(SimulatorError::ReceiptNotFound(_)) => {
                (StatusCode::NOT_FOUND, json!({ "error": "receipt not found" }))
            }
        };

        (status, Json(payload)).into_response()
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}
