//! Authentication route handlers.
//!
//! Registration, login/logout, identity lookup, and profile completion.
//! These are the only surfaces reachable with a bare [`RequireSession`];
//! everything else goes through the authorization guard.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::middleware::{RequireSession, SESSION_COOKIE_NAME};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile completion request body.
#[derive(Debug, Deserialize)]
pub struct CompleteProfileRequest {
    pub name: String,
}

/// Login response body.
///
/// The token is returned for bearer-style clients; browser clients get the
/// same token as an `HttpOnly` cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: CurrentUser,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user (pending approval, no store).
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.config().session_ttl);
    let user = auth.register(&body.email, &body.name, &body.password).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(CurrentUser::from(&user))))
}

/// Login with email and password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.config().session_ttl);
    let (user, session) = auth.login(&body.email, &body.password).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    let max_age = state.config().session_ttl.as_secs();
    let cookie = format!(
        "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        session.token.as_str()
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LoginResponse {
            token: session.token.into_inner(),
            user: CurrentUser::from(&user),
        }),
    ))
}

/// Logout: invalidate the presented session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    session: RequireSession,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.config().session_ttl);
    auth.logout(&session.token).await?;

    tracing::info!(user_id = %session.user.id, "user logged out");

    let cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({ "ok": true })),
    ))
}

/// Return the calling session's user, including approval/provisioning state.
///
/// This is how a pending or unprovisioned client learns which holding page
/// it belongs on.
pub async fn me(session: RequireSession) -> Json<CurrentUser> {
    Json(session.user)
}

/// Update the caller's display name.
pub async fn complete_profile(
    State(state): State<AppState>,
    session: RequireSession,
    Json(body): Json<CompleteProfileRequest>,
) -> Result<Json<CurrentUser>> {
    let auth = AuthService::new(state.pool(), state.config().session_ttl);
    let user = auth.complete_profile(session.user.id, &body.name).await?;

    Ok(Json(CurrentUser::from(&user)))
}
