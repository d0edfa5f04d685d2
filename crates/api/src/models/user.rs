//! User domain type.

use chrono::{DateTime, Utc};

use postkasir_core::{ApprovalStatus, Email, Role, StoreId, UserId};

/// A PostKasir user.
///
/// A user with `store_id = None` is unprovisioned: blocked from all
/// store-scoped operations until an owner approval or the provisioning
/// workflow assigns them a store. The password hash never leaves the
/// repository layer, so it is not part of this type.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role within the assigned store.
    pub role: Role,
    /// Assigned store, if any.
    pub store_id: Option<StoreId>,
    /// Registration approval state.
    pub approval_status: ApprovalStatus,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
