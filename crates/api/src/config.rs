//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POSTKASIR_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `POSTKASIR_HOST` - Bind address (default: 127.0.0.1)
//! - `POSTKASIR_PORT` - Listen port (default: 3000)
//! - `POSTKASIR_SESSION_TTL_SECONDS` - Session lifetime (default: 7 days)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default session lifetime in seconds (7 days).
const DEFAULT_SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Lifetime of newly created sessions
    pub session_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("POSTKASIR_DATABASE_URL")?;
        let host = get_env_or_default("POSTKASIR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("POSTKASIR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("POSTKASIR_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("POSTKASIR_PORT".to_string(), e.to_string()))?;
        let session_ttl = parse_session_ttl(get_optional_env("POSTKASIR_SESSION_TTL_SECONDS"))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            session_ttl,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the session TTL, rejecting zero (a zero-lifetime session can never
/// authenticate anything and is always a misconfiguration).
fn parse_session_ttl(raw: Option<String>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_SESSION_TTL_SECONDS));
    };

    let seconds = raw.parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("POSTKASIR_SESSION_TTL_SECONDS".to_string(), e.to_string())
    })?;

    if seconds == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "POSTKASIR_SESSION_TTL_SECONDS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }

    Ok(Duration::from_secs(seconds))
}
