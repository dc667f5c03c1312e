//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use novella_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A store failed to initialise.
    #[error("startup error: {0}")]
    Startup(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::ChapterNotFound(_) => (StatusCode::NOT_FOUND, "chapter_not_found"),
            DomainError::MalformedContent { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "malformed_content")
            }
            DomainError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            DomainError::ChapterLocked { .. } => (StatusCode::FORBIDDEN, "chapter_locked"),
            DomainError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use novella_core::ids::ChapterId;
    use uuid::Uuid;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_chapter_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::ChapterNotFound(ChapterId::FIRST)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_session_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::SessionNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_malformed_content_maps_to_422() {
        assert_eq!(
            status_of(DomainError::MalformedContent {
                chapter_id: ChapterId::FIRST,
                reason: "scenarios is empty".into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_unauthenticated_maps_to_401() {
        assert_eq!(
            status_of(DomainError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_chapter_locked_maps_to_403() {
        assert_eq!(
            status_of(DomainError::ChapterLocked {
                chapter_id: ChapterId::new(4).unwrap(),
                unlocked: 2,
            }),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(DomainError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
