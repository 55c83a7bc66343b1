//! Global application error types and handlers.
//!
//! `AppError` is what every handler returns on failure. It maps each failure
//! onto a status code and a `{"message": ...}` body. Workflow failures caused
//! by the caller are all 400s, resource type mismatches are 409s and store
//! failures are logged and reported as 500s without leaking details.

use adapters::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::SessionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Content-Type must be application/vnd.api+json instead of {0}.")]
    UnsupportedContentType(String),

    #[error("Incorrect type. Type must be {expected}, instead of {actual}.")]
    IncorrectType { expected: &'static str, actual: String },

    #[error("{0}")]
    BadRequest(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Session(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Session(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::IncorrectType { .. } => StatusCode::CONFLICT,
            AppError::UnsupportedContentType(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MISSING_SESSION_HEADER, ROLES_NOT_FOUND};

    #[test]
    fn caller_mistakes_are_bad_requests() {
        assert_eq!(
            AppError::from(SessionError::InvalidRequest(MISSING_SESSION_HEADER)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(SessionError::NotFound(ROLES_NOT_FOUND)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::from(SessionError::InvalidSession).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failures_are_server_errors() {
        let wrapped = SessionError::Store(StoreError::Unavailable("down".into()));
        assert_eq!(AppError::from(wrapped).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::from(StoreError::MissingBinding("uri".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn type_mismatch_is_a_conflict() {
        let err = AppError::IncorrectType {
            expected: "sessions",
            actual: "accounts".into(),
        };
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "Incorrect type. Type must be sessions, instead of accounts.");
    }
}
