//! Error types for spawn-models

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while interpreting a spawn rule document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}
