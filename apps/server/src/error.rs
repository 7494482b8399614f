//! Error types for the search server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or out-of-range request parameters. Raised before any backend call.
    #[error("Invalid search parameter: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Search backend error: {0}")]
    SearchBackend(String),

    #[error("Search backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Database(_)
            | Error::SearchBackend(_)
            | Error::Http(_)
            | Error::Config(_)
            | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Backend text is passed through: this is an internal tool and the
        // operator needs the underlying failure to act on it.
        let detail = if status.is_server_error() {
            tracing::error!(error = %self, "Search request failed");
            format!("Search failed: {}", self)
        } else {
            tracing::debug!(error = %self, "Rejected search request");
            self.to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
