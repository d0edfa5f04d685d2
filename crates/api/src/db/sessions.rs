//! Session store: opaque token persistence with lazy expiry.
//!
//! `lookup` is the only read path the authorization guard uses; it treats
//! expired rows as not-found, so a row physically surviving past its
//! `expires_at` is harmless until [`SessionRepository::delete_expired`]
//! sweeps it.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore;
use sqlx::PgPool;

use postkasir_core::{SessionToken, UserId};

use super::RepositoryError;
use crate::models::Session;

/// Number of random bytes per token (43 base64 characters).
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random session token.
///
/// 32 bytes from the thread-local CSPRNG, URL-safe base64 without padding.
#[must_use]
pub fn generate_token() -> SessionToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let encoded = URL_SAFE_NO_PAD.encode(bytes);
    SessionToken::parse(&encoded).unwrap_or_else(|e| {
        // 32 bytes always encode to 43 URL-safe characters
        unreachable!("generated token failed validation: {e}")
    })
}

/// Database row for a session.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    token: String,
    user_id: i32,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Result<Session, RepositoryError> {
        let token = SessionToken::parse(&self.token).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid session token in database: {e}"))
        })?;

        Ok(Session {
            token,
            user_id: UserId::new(self.user_id),
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}

/// Repository for session database operations.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a session for `user_id`, expiring after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, user_id: UserId, ttl: Duration) -> Result<Session, RepositoryError> {
        let token = generate_token();
        let expires_at = Utc::now() + ttl;

        let row = sqlx::query_as::<_, SessionRow>(
            r"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, user_id, created_at, expires_at
            ",
        )
        .bind(token.as_str())
        .bind(user_id.as_i32())
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        row.into_session()
    }

    /// Look up an unexpired session by token.
    ///
    /// Expired sessions are not-found; the row may still exist physically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lookup(&self, token: &SessionToken) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            SELECT token, user_id, created_at, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > now()
            ",
        )
        .bind(token.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(SessionRow::into_session).transpose()
    }

    /// Invalidate a single session (logout).
    ///
    /// Returns `true` if a session was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn invalidate(&self, token: &SessionToken) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Invalidate every session system-wide (force re-login).
    ///
    /// A single DELETE: no session created before this statement commits
    /// remains valid after it returns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn invalidate_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions").execute(self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Invalidate every session belonging to one user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn invalidate_all_for_user(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete expired session rows.
    ///
    /// Housekeeping only - `lookup` already treats expired rows as
    /// not-found, so correctness never depends on this running.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
