//! Store repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use postkasir_core::{Currency, StoreId};

use super::RepositoryError;
use crate::models::Store;

/// Database row for a store.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i32,
    name: String,
    currency: String,
    timezone: String,
    created_at: DateTime<Utc>,
}

impl StoreRow {
    fn into_store(self) -> Result<Store, RepositoryError> {
        let currency = self.currency.parse::<Currency>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid currency in database: {e}"))
        })?;

        Ok(Store {
            id: StoreId::new(self.id),
            name: self.name,
            currency,
            timezone: self.timezone,
            created_at: self.created_at,
        })
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        name: &str,
        currency: Currency,
        timezone: &str,
    ) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO stores (name, currency, timezone)
            VALUES ($1, $2, $3)
            RETURNING id, name, currency, timezone, created_at
            ",
        )
        .bind(name)
        .bind(currency.code())
        .bind(timezone)
        .fetch_one(self.pool)
        .await?;

        row.into_store()
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, currency, timezone, created_at
            FROM stores
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(StoreRow::into_store).transpose()
    }

    /// Get the first store by id, if any exists.
    ///
    /// Single-tenant shortcut used by the provisioning workflow: when
    /// multiple stores exist the lowest id wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first(&self) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, currency, timezone, created_at
            FROM stores
            ORDER BY id
            LIMIT 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        row.map(StoreRow::into_store).transpose()
    }

    /// List all stores ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, currency, timezone, created_at
            FROM stores
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(StoreRow::into_store).collect()
    }
}
