use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to callers whenever article generation fails.
pub const GENERATION_FAILED: &str = "Failed to generate recipe content";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Retrieval unavailable: {0}")]
    Retrieval(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Request errors can echo the Authorization header or full URLs
            Error::Http(_) => "External HTTP request failed".to_string(),

            Error::Internal(msg) | Error::Llm(msg) | Error::Generation(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("api key") || lower.contains("secret") || lower.contains("token")
                {
                    format!("{} (details redacted)", self.kind())
                } else {
                    format!("{}: {msg}", self.kind())
                }
            }

            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Retrieval(msg) => format!("Retrieval unavailable: {msg}"),
            Error::Template(_) => "Template rendering failed".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "Validation error",
            Error::Generation(_) => "Generation error",
            Error::Retrieval(_) => "Retrieval unavailable",
            Error::Llm(_) => "Language model error",
            Error::Http(_) => "HTTP error",
            Error::Template(_) => "Template error",
            Error::Config(_) => "Configuration error",
            Error::Internal(_) => "Internal error",
        }
    }
}

// Implement IntoResponse for API error handling
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        match self {
            Error::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            // The detail string goes back to the caller as-is; this service is
            // meant for internal use.
            Error::Generation(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": GENERATION_FAILED,
                    "details": details,
                })),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}
