//! Database migration command.

use tracing::info;

use postkasir_api::db;

/// Run the embedded migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    db::run_migrations(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
