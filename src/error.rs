//! Error types for model loading and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::io;
use thiserror::Error;
use utoipa::ToSchema;

/// Reasons a model file is refused at startup.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse model JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model defines no classes")]
    NoClasses,

    #[error("class '{class}' is missing from {table}")]
    MissingClass { class: String, table: &'static str },

    #[error("alpha must be positive and keep smoothed probabilities representable, got {0}")]
    InvalidAlpha(f64),

    #[error("prior for class '{class}' must be in (0, 1], got {prior}")]
    InvalidPrior { class: String, prior: f64 },
}

/// Body of every JSON error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced to API clients.
#[derive(Debug)]
pub enum ApiError {
    /// Body was not JSON, not an object, or had no string `text` field.
    MissingText,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingText => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Please provide 'text'".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
