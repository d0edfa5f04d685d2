//! Database-backed tests for store scoping and the approval state machine.
//!
//! Every repository read carries a store id; these tests prove that one
//! store's data and pending users are invisible to another store.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use postkasir_api::db::{ProductRepository, RepositoryError, SessionRepository, StoreRepository, UserRepository};
use postkasir_api::models::{AuthContext, Store};
use postkasir_api::services::{AuthError, AuthService};
use postkasir_core::{ApprovalStatus, Currency, Role};
use postkasir_integration_tests::{reset_database, test_pool};
use sqlx::PgPool;

const TTL: Duration = Duration::from_secs(3600);

async fn two_stores(pool: &PgPool) -> (Store, Store) {
    let stores = StoreRepository::new(pool);
    let a = stores
        .create("Toko A", Currency::Idr, "Asia/Jakarta")
        .await
        .unwrap();
    let b = stores
        .create("Toko B", Currency::Sgd, "Asia/Singapore")
        .await
        .unwrap();
    (a, b)
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_products_are_invisible_across_stores() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, store_b) = two_stores(&pool).await;
    let products = ProductRepository::new(&pool);

    let kopi = products
        .create(store_a.id, "Kopi Susu", "KOPI-01", 18_000)
        .await
        .unwrap();
    let teh = products
        .create(store_b.id, "Teh Tarik", "TEH-01", 12_000)
        .await
        .unwrap();

    let listed = products.list(store_a.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, kopi.id);

    // A store B product id looked up through store A simply does not exist
    assert!(products.get(store_a.id, teh.id).await.unwrap().is_none());
    assert!(products.get(store_b.id, teh.id).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_sku_unique_per_store_not_globally() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, store_b) = two_stores(&pool).await;
    let products = ProductRepository::new(&pool);

    products
        .create(store_a.id, "Kopi Susu", "KOPI-01", 18_000)
        .await
        .unwrap();

    // Same SKU in a different store is fine
    products
        .create(store_b.id, "Kopi Susu", "KOPI-01", 20_000)
        .await
        .unwrap();

    // Same SKU in the same store conflicts
    let err = products
        .create(store_a.id, "Kopi Hitam", "KOPI-01", 15_000)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_approval_assigns_owners_store() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, _) = two_stores(&pool).await;
    let auth = AuthService::new(&pool, TTL);
    let candidate = auth
        .register("kasir@toko.test", "Kasir", "password123")
        .await
        .unwrap();
    assert_eq!(candidate.approval_status, ApprovalStatus::Pending);
    assert!(candidate.store_id.is_none());

    let owner_ctx = AuthContext {
        user_id: candidate.id,
        store_id: store_a.id,
        role: Role::Owner,
    };

    let approved = auth.approve_user(&owner_ctx, candidate.id).await.unwrap();
    assert_eq!(approved.approval_status, ApprovalStatus::Approved);
    assert_eq!(approved.store_id, Some(store_a.id));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_rejection_is_terminal_and_kills_sessions() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, _) = two_stores(&pool).await;
    let auth = AuthService::new(&pool, TTL);
    let candidate = auth
        .register("kasir@toko.test", "Kasir", "password123")
        .await
        .unwrap();
    let (_, session) = auth.login("kasir@toko.test", "password123").await.unwrap();

    let owner_ctx = AuthContext {
        user_id: candidate.id,
        store_id: store_a.id,
        role: Role::Owner,
    };

    let rejected = auth.reject_user(&owner_ctx, candidate.id).await.unwrap();
    assert_eq!(rejected.approval_status, ApprovalStatus::Rejected);

    // Their existing token stops authenticating immediately
    let sessions = SessionRepository::new(&pool);
    assert!(sessions.lookup(&session.token).await.unwrap().is_none());

    // Rejection is final: no approve after reject
    let err = auth.approve_user(&owner_ctx, candidate.id).await.unwrap_err();
    assert!(matches!(
        err,
        AuthError::InvalidTransition {
            from: ApprovalStatus::Rejected,
            to: ApprovalStatus::Approved,
        }
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_rejected_user_cannot_log_back_in() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, _) = two_stores(&pool).await;
    let auth = AuthService::new(&pool, TTL);
    let candidate = auth
        .register("kasir@toko.test", "Kasir", "password123")
        .await
        .unwrap();

    let owner_ctx = AuthContext {
        user_id: candidate.id,
        store_id: store_a.id,
        role: Role::Owner,
    };
    auth.reject_user(&owner_ctx, candidate.id).await.unwrap();

    // A fresh login would mint a session that undoes the invalidation
    let err = auth
        .login("kasir@toko.test", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::AccountRejected));

    let session_count: i64 = sqlx::query_scalar("SELECT count(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(session_count, 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_owner_cannot_decide_on_another_stores_user() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, store_b) = two_stores(&pool).await;
    let auth = AuthService::new(&pool, TTL);
    let candidate = auth
        .register("kasir@toko.test", "Kasir", "password123")
        .await
        .unwrap();

    // Candidate already belongs to store B
    let users = UserRepository::new(&pool);
    users.assign_store(candidate.id, store_b.id).await.unwrap();

    let owner_a_ctx = AuthContext {
        user_id: candidate.id,
        store_id: store_a.id,
        role: Role::Owner,
    };

    // Indistinguishable from a nonexistent user
    let err = auth
        .approve_user(&owner_a_ctx, candidate.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));

    // Staff cannot decide at all, even within their own store
    let staff_ctx = AuthContext {
        user_id: candidate.id,
        store_id: store_b.id,
        role: Role::Staff,
    };
    let err = auth
        .approve_user(&staff_ctx, candidate.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotOwner));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL test database"]
async fn test_pending_listing_scoped_to_store() {
    let pool = test_pool().await;
    reset_database(&pool).await;

    let (store_a, store_b) = two_stores(&pool).await;
    let auth = AuthService::new(&pool, TTL);

    let unassigned = auth
        .register("baru@toko.test", "Baru", "password123")
        .await
        .unwrap();
    let elsewhere = auth
        .register("lain@toko.test", "Lain", "password123")
        .await
        .unwrap();

    let users = UserRepository::new(&pool);
    users.assign_store(elsewhere.id, store_b.id).await.unwrap();

    // Store A's owner sees unassigned candidates, not store B's
    let pending = users.list_pending(store_a.id).await.unwrap();
    let ids: Vec<_> = pending.iter().map(|u| u.id).collect();
    assert!(ids.contains(&unassigned.id));
    assert!(!ids.contains(&elsewhere.id));

    let pending_b = users.list_pending(store_b.id).await.unwrap();
    let ids_b: Vec<_> = pending_b.iter().map(|u| u.id).collect();
    assert!(ids_b.contains(&elsewhere.id));
}
