//! Product domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use postkasir_core::{ProductId, StoreId};

/// A store-scoped inventory item.
///
/// Prices are integer minor units in the owning store's currency.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// The store this product belongs to.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Stock keeping unit, unique within the store.
    pub sku: String,
    /// Price in minor currency units.
    pub price_cents: i64,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
