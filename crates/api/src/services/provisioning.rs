//! Store provisioning workflow.
//!
//! Backfills `store_id` for users created before multi-tenancy existed and
//! invalidates every session, forcing re-authentication so no client keeps
//! trusting pre-backfill authorization state.
//!
//! The whole run executes inside one transaction: an interrupted run leaves
//! no partially-provisioned state, and re-running a completed run is a
//! no-op apart from the unconditional session purge. This is an
//! administrative entry point (`pk-cli setup`), never part of request
//! handling; the caller serializes invocations externally.

use sqlx::PgPool;

use postkasir_core::StoreId;

use crate::models::Store;

/// Defaults used when provisioning has to create the store.
#[derive(Debug, Clone)]
pub struct StoreDefaults {
    /// Store display name.
    pub name: String,
    /// Store currency code.
    pub currency: postkasir_core::Currency,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for StoreDefaults {
    fn default() -> Self {
        Self {
            name: "PostKasir Store".to_owned(),
            currency: postkasir_core::Currency::Idr,
            timezone: "Asia/Jakarta".to_owned(),
        }
    }
}

/// The step at which a provisioning run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    /// Resolving or creating the target store.
    ResolveStore,
    /// Backfilling `store_id` on users.
    AssignUsers,
    /// Deleting all sessions.
    InvalidateSessions,
    /// Re-reading users to confirm assignment.
    Verify,
}

impl std::fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolveStore => write!(f, "resolve-store"),
            Self::AssignUsers => write!(f, "assign-users"),
            Self::InvalidateSessions => write!(f, "invalidate-sessions"),
            Self::Verify => write!(f, "verify"),
        }
    }
}

/// Errors from a provisioning run, naming the step that failed.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    /// Could not begin or commit the surrounding transaction.
    #[error("transaction error: {0}")]
    Transaction(#[source] sqlx::Error),

    /// A step's query failed; nothing was committed.
    #[error("provisioning failed at step {step}: {source}")]
    Step {
        /// The failing step.
        step: ProvisioningStep,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// Verification found users still unassigned. Fatal inconsistency;
    /// nothing was committed.
    #[error("verification failed: {count} users still have no store assigned")]
    UnassignedUsers {
        /// How many users remain unassigned.
        count: i64,
    },
}

/// Summary of a completed provisioning run.
#[derive(Debug, Clone, Copy)]
pub struct ProvisioningReport {
    /// The target store every user now points at.
    pub store_id: StoreId,
    /// Whether the run had to create the store.
    pub store_created: bool,
    /// Users whose `store_id` was (re)written.
    pub users_updated: u64,
    /// Sessions deleted by the unconditional purge.
    pub sessions_cleared: u64,
}

/// Administrative store provisioning workflow.
pub struct ProvisioningWorkflow<'a> {
    pool: &'a PgPool,
}

impl<'a> ProvisioningWorkflow<'a> {
    /// Create a new workflow over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the full provisioning sequence. Idempotent.
    ///
    /// 1. Resolve the target store: first existing store by id, else create
    ///    one from `defaults` (single-tenant shortcut).
    /// 2. Point every user not already on the target store at it.
    /// 3. Delete all sessions, unconditionally.
    /// 4. Verify no user remains without a store.
    ///
    /// # Errors
    ///
    /// Returns `ProvisioningError` naming the failing step; the
    /// transaction rolls back, so a failed run leaves state untouched and
    /// is safe to re-run.
    pub async fn run(
        &self,
        defaults: &StoreDefaults,
    ) -> Result<ProvisioningReport, ProvisioningError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(ProvisioningError::Transaction)?;

        // Step 1: resolve target store
        let existing: Option<i32> =
            sqlx::query_scalar("SELECT id FROM stores ORDER BY id LIMIT 1")
                .fetch_optional(&mut *tx)
                .await
                .map_err(|source| ProvisioningError::Step {
                    step: ProvisioningStep::ResolveStore,
                    source,
                })?;

        let (store_id, store_created) = match existing {
            Some(id) => (id, false),
            None => {
                let id: i32 = sqlx::query_scalar(
                    r"
                    INSERT INTO stores (name, currency, timezone)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    ",
                )
                .bind(&defaults.name)
                .bind(defaults.currency.code())
                .bind(&defaults.timezone)
                .fetch_one(&mut *tx)
                .await
                .map_err(|source| ProvisioningError::Step {
                    step: ProvisioningStep::ResolveStore,
                    source,
                })?;
                (id, true)
            }
        };
        tracing::info!(store_id, store_created, "resolved target store");

        // Step 2: backfill store assignment
        let users_updated = sqlx::query(
            r"
            UPDATE users
            SET store_id = $1, updated_at = now()
            WHERE store_id IS DISTINCT FROM $1
            ",
        )
        .bind(store_id)
        .execute(&mut *tx)
        .await
        .map_err(|source| ProvisioningError::Step {
            step: ProvisioningStep::AssignUsers,
            source,
        })?
        .rows_affected();
        tracing::info!(users_updated, "assigned users to target store");

        // Step 3: session purge. Unconditional: existing tokens may encode
        // client state from before the backfill.
        let sessions_cleared = sqlx::query("DELETE FROM sessions")
            .execute(&mut *tx)
            .await
            .map_err(|source| ProvisioningError::Step {
                step: ProvisioningStep::InvalidateSessions,
                source,
            })?
            .rows_affected();
        tracing::info!(sessions_cleared, "invalidated all sessions");

        // Step 4: verify
        let unassigned: i64 = sqlx::query_scalar("SELECT count(*) FROM users WHERE store_id IS NULL")
            .fetch_one(&mut *tx)
            .await
            .map_err(|source| ProvisioningError::Step {
                step: ProvisioningStep::Verify,
                source,
            })?;

        if unassigned > 0 {
            return Err(ProvisioningError::UnassignedUsers { count: unassigned });
        }

        tx.commit().await.map_err(ProvisioningError::Transaction)?;

        Ok(ProvisioningReport {
            store_id: StoreId::new(store_id),
            store_created,
            users_updated,
            sessions_cleared,
        })
    }
}

/// Fetch the stores and users needed for the read-only status report.
///
/// Used by `pk-cli status`; lives here so the CLI stays a thin shell.
///
/// # Errors
///
/// Returns `RepositoryError` if either query fails.
pub async fn status_report(
    pool: &PgPool,
) -> Result<(Vec<Store>, Vec<crate::models::User>), crate::db::RepositoryError> {
    let stores = crate::db::StoreRepository::new(pool).list().await?;
    let users = crate::db::UserRepository::new(pool).list_all().await?;
    Ok((stores, users))
}
