//! The authorization guard: session token in, authorization context out.
//!
//! Resolution is read-only and re-derives everything from current state:
//! the session proves who is calling, but store and role come from the user
//! row at resolution time, never from the session. A role or store change
//! therefore takes effect on the user's next request.

use sqlx::PgPool;

use postkasir_core::SessionToken;

use crate::db::{RepositoryError, SessionRepository, UserRepository};
use crate::models::{AuthContext, CurrentUser};

/// Reasons the guard refuses to produce an [`AuthContext`].
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// Token missing, malformed, not found, or expired.
    #[error("unauthenticated")]
    Unauthenticated,

    /// User has no store assigned; only profile completion is allowed.
    #[error("user has no store assigned")]
    Unprovisioned,

    /// User is not approved; only the holding surfaces are allowed.
    #[error("user is awaiting approval")]
    PendingApproval,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Resolves inbound session tokens to authorization contexts.
pub struct AuthorizationGuard<'a> {
    sessions: SessionRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> AuthorizationGuard<'a> {
    /// Create a new guard over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    /// Resolve a token to a full authorization context.
    ///
    /// # Errors
    ///
    /// - [`GuardError::Unauthenticated`] - session not found or expired, or
    ///   its user no longer exists.
    /// - [`GuardError::Unprovisioned`] - the user has no store assigned.
    /// - [`GuardError::PendingApproval`] - the user is not approved.
    pub async fn resolve(&self, token: &SessionToken) -> Result<AuthContext, GuardError> {
        let user = self.resolve_user(token).await?;

        let Some(store_id) = user.store_id else {
            return Err(GuardError::Unprovisioned);
        };

        if user.approval_status != postkasir_core::ApprovalStatus::Approved {
            return Err(GuardError::PendingApproval);
        }

        Ok(AuthContext {
            user_id: user.id,
            store_id,
            role: user.role,
        })
    }

    /// Resolve a token to the session's user without provisioning or
    /// approval checks.
    ///
    /// Serves only the holding surfaces (`/auth/me`, logout, profile
    /// completion) where a pending or unprovisioned user is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Unauthenticated`] if the session is missing,
    /// expired, or its user no longer exists.
    pub async fn resolve_session_user(
        &self,
        token: &SessionToken,
    ) -> Result<CurrentUser, GuardError> {
        let user = self.resolve_user(token).await?;
        Ok(CurrentUser::from(&user))
    }

    async fn resolve_user(&self, token: &SessionToken) -> Result<crate::models::User, GuardError> {
        let session = self
            .sessions
            .lookup(token)
            .await?
            .ok_or(GuardError::Unauthenticated)?;

        // A session whose user row is gone authenticates nothing
        self.users
            .get_by_id(session.user_id)
            .await?
            .ok_or(GuardError::Unauthenticated)
    }
}
