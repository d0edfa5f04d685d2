//! Store (tenant) domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use postkasir_core::{Currency, StoreId};

/// A store: the tenant whose data must stay isolated from every other store.
///
/// `id` is immutable after creation. Stores are created once by provisioning
/// and read-mostly thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name of the store.
    pub name: String,
    /// Currency the store prices inventory in.
    pub currency: Currency,
    /// IANA timezone name (e.g., "Asia/Jakarta").
    pub timezone: String,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}
