//! Integration tests for PostKasir.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a PostgreSQL instance and export its URL
//! export POSTKASIR_TEST_DATABASE_URL=postgres://postgres@localhost/pk_test
//!
//! # Run migrations, then the API server for the HTTP tests
//! cargo run -p postkasir-cli -- migrate
//! cargo run -p postkasir-api
//!
//! # Run ignored integration tests
//! cargo test -p postkasir-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - HTTP tests against a running API server
//! - `provisioning` - Database-backed workflow and session store tests
//! - `tenant_isolation` - Database-backed store scoping tests

use secrecy::SecretString;
use sqlx::PgPool;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("POSTKASIR_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Connect to the dedicated test database.
///
/// Reads `POSTKASIR_TEST_DATABASE_URL`; never falls back to the main
/// database URL, because these tests destroy data.
///
/// # Panics
///
/// Panics if the variable is unset or the connection fails.
#[allow(clippy::unwrap_used)]
pub async fn test_pool() -> PgPool {
    let url = std::env::var("POSTKASIR_TEST_DATABASE_URL")
        .expect("POSTKASIR_TEST_DATABASE_URL must point at a disposable test database");
    postkasir_api::db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database")
}

/// Wipe all rows between tests, preserving the schema.
///
/// # Panics
///
/// Panics if the truncate fails.
pub async fn reset_database(pool: &PgPool) {
    sqlx::query("TRUNCATE products, sessions, users, stores RESTART IDENTITY CASCADE")
        .execute(pool)
        .await
        .expect("Failed to reset test database");
}

/// Create an HTTP client with a cookie store.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
