//! Database access for the PostKasir `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `stores` - Tenant registry; each store is an isolation boundary
//! - `users` - Identity, role, approval status, store assignment
//! - `sessions` - Opaque session tokens with expiry
//! - `products` - Store-scoped inventory (exercises tenant isolation)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run explicitly via:
//! ```bash
//! cargo run -p postkasir-cli -- migrate
//! ```
//! They are never run automatically on server startup.

pub mod products;
pub mod sessions;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use products::ProductRepository;
pub use sessions::SessionRepository;
pub use stores::StoreRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the embedded migrations against the given pool.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
