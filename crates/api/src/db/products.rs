//! Product repository for database operations.
//!
//! Every query here takes a `StoreId` and filters by it. There is
//! deliberately no "get by id across stores" - a product from another store
//! must be indistinguishable from one that does not exist.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use postkasir_core::{ProductId, StoreId};

use super::RepositoryError;
use crate::models::Product;

/// Database row for a product.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    store_id: i32,
    name: String,
    sku: String,
    price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            store_id: StoreId::new(self.store_id),
            name: self.name,
            sku: self.sku,
            price_cents: self.price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for store-scoped product operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product in the given store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU already exists in the
    /// store. Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        store_id: StoreId,
        name: &str,
        sku: &str,
        price_cents: i64,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (store_id, name, sku, price_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING id, store_id, name, sku, price_cents, created_at, updated_at
            ",
        )
        .bind(store_id.as_i32())
        .bind(name)
        .bind(sku)
        .bind(price_cents)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("sku already exists in store".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into_product())
    }

    /// Get a product by id within a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store_id: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, store_id, name, sku, price_cents, created_at, updated_at
            FROM products
            WHERE store_id = $1 AND id = $2
            ",
        )
        .bind(store_id.as_i32())
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    /// List all products in a store ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, store_id, name, sku, price_cents, created_at, updated_at
            FROM products
            WHERE store_id = $1
            ORDER BY id
            ",
        )
        .bind(store_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }
}
