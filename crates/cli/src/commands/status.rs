//! Read-only database status report.
//!
//! Lists stores and users (emails masked) so an operator can confirm the
//! provisioning state without seeing personal data. Also sweeps expired
//! session rows as housekeeping - lookup never returns them anyway.

use tracing::{info, warn};

use postkasir_api::db::{self, SessionRepository};
use postkasir_api::services::provisioning::status_report;

/// Print the status report.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a query fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let pool = db::create_pool(&database_url).await?;

    let (stores, users) = status_report(&pool).await?;

    info!("PostKasir Database Status");
    info!("=========================");

    info!("Stores: {}", stores.len());
    for store in &stores {
        info!(
            "  [{}] {} ({}, {})",
            store.id, store.name, store.currency, store.timezone
        );
    }

    info!("Users: {}", users.len());
    let mut unassigned = 0usize;
    for user in &users {
        let store = user
            .store_id
            .map_or_else(|| "unassigned".to_string(), |id| format!("store {id}"));
        info!(
            "  [{}] {} - {} - {} - {}",
            user.id,
            user.email.masked(),
            user.role,
            user.approval_status,
            store
        );
        if user.store_id.is_none() {
            unassigned += 1;
        }
    }

    if unassigned > 0 {
        warn!("{unassigned} users have no store assigned; run 'pk-cli setup'");
    }

    let swept = SessionRepository::new(&pool).delete_expired().await?;
    if swept > 0 {
        info!("Swept {swept} expired session rows");
    }

    Ok(())
}
