//! CLI command implementations.

pub mod migrate;
pub mod setup;
pub mod status;

use secrecy::SecretString;

/// Errors shared by the CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load the database URL from the environment.
///
/// Tries `POSTKASIR_DATABASE_URL` first, then the generic `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("POSTKASIR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("POSTKASIR_DATABASE_URL"))
}
