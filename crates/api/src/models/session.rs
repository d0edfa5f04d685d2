//! Session domain type.

use chrono::{DateTime, Utc};

use postkasir_core::{SessionToken, UserId};

/// A server-issued session.
///
/// Sessions carry no authorization data - only the user reference. Role and
/// store are re-read from the user at resolution time, so role or store
/// changes take effect on the next authenticated request without touching
/// session rows. Sessions are never mutated: created at login, deleted at
/// logout or by bulk invalidation.
#[derive(Debug, Clone)]
pub struct Session {
    /// The opaque credential identifying this session.
    pub token: SessionToken,
    /// The user this session authenticates.
    pub user_id: UserId,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session is expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
