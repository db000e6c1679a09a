//! Domain-level error types.

use thiserror::Error;

/// Domain errors - failures of pure document and upload logic.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid post format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported upload: {0}")]
    UnsupportedType(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Filesystem operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl RepoError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        RepoError::NotFound {
            entity,
            key: key.into(),
        }
    }
}
