//! Error handling - maps failures onto `{success: false, error}` responses.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use press_core::error::{DomainError, RepoError};
use press_shared::ErrorResponse;

/// Application-level error type returned by handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg,
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                detail
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse::new(message.clone()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::UnsupportedType(msg) => {
                AppError::BadRequest(msg)
            }
            DomainError::InvalidFormat(msg) => {
                tracing::warn!(reason = %msg, "Unreadable post file");
                AppError::BadRequest("Invalid post format".to_string())
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, .. } => AppError::NotFound(format!("{entity} not found")),
            RepoError::Domain(err) => err.into(),
            err @ RepoError::Io(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn test_repo_errors_map_to_status() {
        let not_found: AppError = RepoError::not_found("Post", "x").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let invalid: AppError = RepoError::from(DomainError::Validation("bad".into())).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let io: AppError = RepoError::from(std::io::Error::other("disk")).into();
        assert_eq!(io.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response = AppError::Internal("disk full".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "disk full");
    }
}
