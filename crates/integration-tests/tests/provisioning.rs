//! Database-backed tests for the provisioning workflow, session store, and
//! authorization guard.
//!
//! These tests require a migrated, disposable `PostgreSQL` database:
//! `POSTKASIR_TEST_DATABASE_URL`. They truncate tables between runs.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use postkasir_api::db::SessionRepository;
use postkasir_api::services::guard::{AuthorizationGuard, GuardError};
use postkasir_api::services::provisioning::status_report;
use postkasir_api::services::{AuthService, ProvisioningWorkflow, StoreDefaults};
use postkasir_integration_tests::{reset_database, test_pool};

const TTL: Duration = Duration::from_secs(3600);

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_provisioning_creates_store_and_assigns_all_users() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let auth = AuthService::new(&pool, TTL);
    auth.register("owner@toko.test", "Owner", "password123")
        .await
        .unwrap();
    auth.register("kasir@toko.test", "Kasir", "password123")
        .await
        .unwrap();

    let report = ProvisioningWorkflow::new(&pool)
        .run(&StoreDefaults::default())
        .await
        .unwrap();

    assert!(report.store_created);
    assert_eq!(report.users_updated, 2);

    let (stores, users) = status_report(&pool).await.unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(users.len(), 2);
    for user in &users {
        assert_eq!(user.store_id, Some(report.store_id));
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_provisioning_is_idempotent() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let auth = AuthService::new(&pool, TTL);
    auth.register("owner@toko.test", "Owner", "password123")
        .await
        .unwrap();

    let workflow = ProvisioningWorkflow::new(&pool);
    let first = workflow.run(&StoreDefaults::default()).await.unwrap();
    let second = workflow.run(&StoreDefaults::default()).await.unwrap();

    assert!(first.store_created);
    assert!(!second.store_created);
    assert_eq!(second.store_id, first.store_id);
    assert_eq!(second.users_updated, 0);

    let (stores, _) = status_report(&pool).await.unwrap();
    assert_eq!(stores.len(), 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_provisioning_invalidates_existing_sessions() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let auth = AuthService::new(&pool, TTL);
    auth.register("owner@toko.test", "Owner", "password123")
        .await
        .unwrap();
    let (_, session) = auth.login("owner@toko.test", "password123").await.unwrap();

    let sessions = SessionRepository::new(&pool);
    assert!(sessions.lookup(&session.token).await.unwrap().is_some());

    let report = ProvisioningWorkflow::new(&pool)
        .run(&StoreDefaults::default())
        .await
        .unwrap();

    assert_eq!(report.sessions_cleared, 1);
    assert!(sessions.lookup(&session.token).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_invalidate_all_kills_every_token() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let auth = AuthService::new(&pool, TTL);
    auth.register("a@toko.test", "A", "password123").await.unwrap();
    auth.register("b@toko.test", "B", "password123").await.unwrap();
    let (_, s1) = auth.login("a@toko.test", "password123").await.unwrap();
    let (_, s2) = auth.login("b@toko.test", "password123").await.unwrap();

    let sessions = SessionRepository::new(&pool);
    let cleared = sessions.invalidate_all().await.unwrap();
    assert_eq!(cleared, 2);

    assert!(sessions.lookup(&s1.token).await.unwrap().is_none());
    assert!(sessions.lookup(&s2.token).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_expired_session_is_not_found() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let auth = AuthService::new(&pool, TTL);
    let user = auth
        .register("a@toko.test", "A", "password123")
        .await
        .unwrap();

    // Zero TTL: expired the instant it is created, row still physically there
    let sessions = SessionRepository::new(&pool);
    let session = sessions.create(user.id, Duration::ZERO).await.unwrap();

    assert!(sessions.lookup(&session.token).await.unwrap().is_none());

    let row_count: i64 = sqlx::query_scalar("SELECT count(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row_count, 1);

    assert_eq!(sessions.delete_expired().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_guard_blocks_unprovisioned_then_pending_then_allows() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let auth = AuthService::new(&pool, TTL);
    let user = auth
        .register("kasir@toko.test", "Kasir", "password123")
        .await
        .unwrap();
    let (_, session) = auth.login("kasir@toko.test", "password123").await.unwrap();

    let guard = AuthorizationGuard::new(&pool);

    // No store assigned: unprovisioned regardless of approval state
    assert!(matches!(
        guard.resolve(&session.token).await,
        Err(GuardError::Unprovisioned)
    ));

    // Assigned but still pending
    let stores = postkasir_api::db::StoreRepository::new(&pool);
    let store = stores
        .create("Toko", postkasir_core::Currency::Idr, "Asia/Jakarta")
        .await
        .unwrap();
    let users = postkasir_api::db::UserRepository::new(&pool);
    users.assign_store(user.id, store.id).await.unwrap();

    assert!(matches!(
        guard.resolve(&session.token).await,
        Err(GuardError::PendingApproval)
    ));

    // Approved: same token now resolves, with current store and role
    users
        .set_approval(user.id, postkasir_core::ApprovalStatus::Approved)
        .await
        .unwrap();

    let ctx = guard.resolve(&session.token).await.unwrap();
    assert_eq!(ctx.user_id, user.id);
    assert_eq!(ctx.store_id, store.id);

    // The holding extractor works in every state
    let current = guard.resolve_session_user(&session.token).await.unwrap();
    assert_eq!(current.id, user.id);
}
