//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::guard::GuardError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication/approval operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Authorization guard refused the request.
    #[error("Guard error: {0}")]
    Guard(#[from] GuardError),

    /// Resource not found (or belongs to another store).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Role lacks permission for the store-scoped resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// State conflict (duplicate email, terminal approval state).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this is a server-side failure worth reporting.
    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
                | Self::Internal(_)
                | Self::Guard(GuardError::Repository(_))
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Guard(err) => match err {
                GuardError::Unauthenticated => StatusCode::UNAUTHORIZED,
                GuardError::Unprovisioned | GuardError::PendingApproval => StatusCode::FORBIDDEN,
                GuardError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists | AuthError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::NotOwner | AuthError::AccountRejected => StatusCode::FORBIDDEN,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message; internal details never leak.
    fn message(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Guard(err) => match err {
                GuardError::Unauthenticated => "Authentication required".to_string(),
                GuardError::Unprovisioned => "No store assigned".to_string(),
                GuardError::PendingApproval => "Account pending approval".to_string(),
                GuardError::Repository(_) => "Internal server error".to_string(),
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::NotOwner => "Only the store owner can do this".to_string(),
                AuthError::AccountRejected => "Account has been rejected".to_string(),
                AuthError::InvalidTransition { from, .. } => {
                    format!("Approval status is already {from}")
                }
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            _ => self.to_string(),
        }
    }

    /// Holding-page redirect for browser clients, where one applies.
    const fn redirect(&self) -> Option<&'static str> {
        match self {
            Self::Guard(GuardError::Unauthenticated) => Some("/login"),
            Self::Guard(GuardError::Unprovisioned) => Some("/complete-profile"),
            Self::Guard(GuardError::PendingApproval) => Some("/pending-approval"),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut body = json!({ "error": self.message() });
        if let Some(redirect) = self.redirect()
            && let Some(map) = body.as_object_mut()
        {
            map.insert("redirect".to_string(), json!(redirect));
        }

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_statuses() {
        assert_eq!(
            AppError::Guard(GuardError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Guard(GuardError::Unprovisioned).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Guard(GuardError::PendingApproval).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_guard_redirects() {
        assert_eq!(
            AppError::Guard(GuardError::Unprovisioned).redirect(),
            Some("/complete-profile")
        );
        assert_eq!(
            AppError::Guard(GuardError::PendingApproval).redirect(),
            Some("/pending-approval")
        );
        assert_eq!(AppError::NotFound("x".into()).redirect(), None);
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AppError::Internal("connection string postgres://secret".into());
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_conflict_statuses() {
        assert_eq!(
            AppError::Auth(AuthError::UserAlreadyExists).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Conflict("sku".into()).status(),
            StatusCode::CONFLICT
        );
        let dup = AppError::Database(RepositoryError::Conflict("sku exists".into()));
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(dup.message(), "sku exists");
        assert!(!dup.is_server_error());
    }
}
