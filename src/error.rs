//! Error types for the PDF server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::gotenberg::GotenbergError;
use crate::templates::TemplateError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API authentication is not configured")]
    AuthNotConfigured,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Rendering a document failed after validation
    #[error("{message}: {source}")]
    Generation {
        message: &'static str,
        #[source]
        source: GenerationError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a document could not be produced
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Engine(#[from] GotenbergError),

    #[error("Rendering task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn generation(message: &'static str, source: impl Into<GenerationError>) -> Self {
        AppError::Generation {
            message,
            source: source.into(),
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Bad Request", msg),
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Unauthorized", msg),
            ),
            AppError::AuthNotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    "Server Configuration Error",
                    "API authentication is not configured",
                ),
            ),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("Not Found", msg))
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorResponse::new("Payload Too Large", msg),
            ),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorResponse::new("Unsupported Media Type", msg),
            ),
            AppError::Generation { message, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal Server Error", message)
                    .with_details(source.to_string()),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body =
                    ErrorResponse::new("Internal Server Error", "An internal error occurred");
                let body = if cfg!(debug_assertions) {
                    body.with_details(msg)
                } else {
                    body
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}
