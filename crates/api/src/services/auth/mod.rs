//! Authentication and approval service.
//!
//! Registration, password login, logout, profile completion, and the
//! owner-driven approval workflow.

mod error;

pub use error::AuthError;

use std::time::Duration;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use postkasir_core::{ApprovalStatus, Email, SessionToken, UserId};

use crate::db::{RepositoryError, SessionRepository, UserRepository};
use crate::models::{AuthContext, Session, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    sessions: SessionRepository<'a>,
    session_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, session_ttl: Duration) -> Self {
        Self {
            users: UserRepository::new(pool),
            sessions: SessionRepository::new(pool),
            session_ttl,
        }
    }

    /// Register a new user.
    ///
    /// The user starts pending and unprovisioned: no store, staff role,
    /// `approval_status = pending`. They can log in, but the guard blocks
    /// everything except the holding surfaces until an owner approves them.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password, creating a new session.
    ///
    /// Pending users may log in - the guard limits what their session can
    /// reach. Rejected users may not: rejection must stay terminal, and a
    /// fresh login would otherwise undo the session invalidation done at
    /// rejection time. Wrong email and wrong password collapse into the
    /// same `InvalidCredentials` answer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountRejected` if the account was rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session), AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if user.approval_status == ApprovalStatus::Rejected {
            return Err(AuthError::AccountRejected);
        }

        let session = self.sessions.create(user.id, self.session_ttl).await?;

        Ok((user, session))
    }

    /// Logout: invalidate the presented session.
    ///
    /// Returns `true` if a session was actually deleted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn logout(&self, token: &SessionToken) -> Result<bool, AuthError> {
        Ok(self.sessions.invalidate(token).await?)
    }

    /// Update the caller's display name (profile completion).
    ///
    /// The one mutation an unprovisioned or pending user is allowed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user no longer exists.
    pub async fn complete_profile(&self, user_id: UserId, name: &str) -> Result<User, AuthError> {
        self.users
            .update_name(user_id, name)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Approve a pending user, acting as a store owner.
    ///
    /// When the target has no store yet, they are assigned the approving
    /// owner's store - approval alone must produce a usable account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotOwner` if the caller is not an owner.
    /// Returns `AuthError::UserNotFound` if the target does not exist.
    /// Returns `AuthError::InvalidTransition` if the target is not pending.
    pub async fn approve_user(&self, ctx: &AuthContext, target: UserId) -> Result<User, AuthError> {
        let user = self
            .transition_approval(ctx, target, ApprovalStatus::Approved)
            .await?;

        if user.store_id.is_none() {
            return Ok(self.users.assign_store(user.id, ctx.store_id).await?);
        }

        Ok(user)
    }

    /// Reject a pending user, acting as a store owner.
    ///
    /// The target's sessions are invalidated: a rejected user's session
    /// must stop authenticating even the holding surfaces.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotOwner` if the caller is not an owner.
    /// Returns `AuthError::UserNotFound` if the target does not exist.
    /// Returns `AuthError::InvalidTransition` if the target is not pending.
    pub async fn reject_user(&self, ctx: &AuthContext, target: UserId) -> Result<User, AuthError> {
        let user = self
            .transition_approval(ctx, target, ApprovalStatus::Rejected)
            .await?;

        self.sessions.invalidate_all_for_user(user.id).await?;

        Ok(user)
    }

    async fn transition_approval(
        &self,
        ctx: &AuthContext,
        target: UserId,
        next: ApprovalStatus,
    ) -> Result<User, AuthError> {
        if !ctx.is_owner() {
            return Err(AuthError::NotOwner);
        }

        let user = self
            .users
            .get_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Owners only decide on users visible to their store
        if user.store_id.is_some_and(|s| s != ctx.store_id) {
            return Err(AuthError::UserNotFound);
        }

        if !user.approval_status.can_transition_to(next) {
            return Err(AuthError::InvalidTransition {
                from: user.approval_status,
                to: next,
            });
        }

        Ok(self.users.set_approval(user.id, next).await?)
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate password strength requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, stored_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(matches!(
            verify_password("wrong password!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordHash)
        ));
    }
}
