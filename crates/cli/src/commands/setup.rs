//! Full store setup (provisioning) command.

use tracing::info;

use postkasir_api::db;
use postkasir_api::services::{ProvisioningWorkflow, StoreDefaults};
use postkasir_core::Currency;

/// Run the provisioning workflow and print its report.
///
/// # Errors
///
/// Returns an error if the currency code is invalid, the database is
/// unreachable, or the workflow fails (the failing step is named; the
/// transaction rolls back, so a failed run is safe to re-run).
pub async fn run(
    store_name: &str,
    currency: &str,
    timezone: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let currency = currency.parse::<Currency>()?;

    let defaults = StoreDefaults {
        name: store_name.to_owned(),
        currency,
        timezone: timezone.to_owned(),
    };

    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running store provisioning...");
    let report = ProvisioningWorkflow::new(&pool).run(&defaults).await?;

    info!("Provisioning complete!");
    info!("  Target store: {}", report.store_id);
    info!("  Store created: {}", report.store_created);
    info!("  Users updated: {}", report.users_updated);
    info!("  Sessions cleared: {}", report.sessions_cleared);
    info!("All clients must log in again.");

    Ok(())
}
