//! Route handlers and router composition.

pub mod auth;
pub mod health;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the full application router.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/complete-profile", post(auth::complete_profile))
        .route("/api/users/pending", get(users::list_pending))
        .route("/api/users/{id}/approve", post(users::approve))
        .route("/api/users/{id}/reject", post(users::reject))
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/{id}", get(products::get_one))
}
