use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::photo::PhotoError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only request-shape problems surface here. Enhancement, export and
/// persistence failures are reported in the response body instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Photo rejected: {0}")]
    Photo(#[from] PhotoError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Photo(e) => {
                let (status, code) = match e {
                    PhotoError::NotAnImage(_) => {
                        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "INVALID_FILE_TYPE")
                    }
                    PhotoError::TooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
                    PhotoError::Empty => (StatusCode::BAD_REQUEST, "EMPTY_FILE"),
                };
                (status, code, e.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
