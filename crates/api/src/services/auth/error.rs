//! Authentication error types.

use thiserror::Error;

use postkasir_core::ApprovalStatus;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and approval operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] postkasir_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Account was rejected; rejected users may not create sessions.
    #[error("account rejected")]
    AccountRejected,

    /// Caller's role does not permit the operation.
    #[error("operation requires the owner role")]
    NotOwner,

    /// Illegal approval state transition (terminal states stay terminal).
    #[error("cannot transition approval status from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ApprovalStatus,
        /// Requested status.
        to: ApprovalStatus,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
