//! HTTP error mapping.
//!
//! Every failure a handler can produce ends up as an [`ApiError`], which
//! renders as `{"message": "..."}` with the matching status code.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::auth::AuthError;
use crate::storage::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::DuplicateUsername => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if let Self::Internal(detail) = &self {
            error!(error = %detail, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => Self::MissingToken,
            AuthError::InvalidToken => Self::InvalidToken,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Forbidden => Self::Forbidden,
            AuthError::DuplicateUsername => Self::DuplicateUsername,
            AuthError::Validation(msg) => Self::Validation(msg),
            AuthError::Storage(e) => e.into(),
            other @ (AuthError::Hashing(_) | AuthError::TokenIssue(_)) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(what),
            DatabaseError::Constraint(rule) => Self::Validation(rule),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<quartermaster_core::Error> for ApiError {
    fn from(e: quartermaster_core::Error) -> Self {
        match e {
            quartermaster_core::Error::Validation(msg) => Self::Validation(msg),
            unknown @ quartermaster_core::Error::UnknownRole(_) => {
                Self::Validation(unknown.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Validation(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::Validation(e.body_text())
    }
}
