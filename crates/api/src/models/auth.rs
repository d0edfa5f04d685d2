//! Request-scoped identity types produced by session resolution.

use serde::Serialize;

use postkasir_core::{ApprovalStatus, Email, Role, StoreId, UserId};

/// The authorization context for a fully provisioned, approved user.
///
/// Produced by the authorization guard and threaded through handlers.
/// `store_id` is always present: every downstream data access must filter
/// by it - that filter is what prevents cross-tenant data leakage.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AuthContext {
    /// The acting user.
    pub user_id: UserId,
    /// The store whose data this request may touch.
    pub store_id: StoreId,
    /// The user's role at resolution time (not session-creation time).
    pub role: Role,
}

impl AuthContext {
    /// Whether the acting user owns the store.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

/// Identity of any authenticated user, including unprovisioned and pending
/// ones.
///
/// Used only by the holding surfaces (`/auth/me`, logout, profile
/// completion); everything store-scoped requires [`AuthContext`] instead.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Assigned store, if provisioned.
    pub store_id: Option<StoreId>,
    /// Registration approval state.
    pub approval_status: ApprovalStatus,
}

impl From<&crate::models::User> for CurrentUser {
    fn from(user: &crate::models::User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            store_id: user.store_id,
            approval_status: user.approval_status,
        }
    }
}
