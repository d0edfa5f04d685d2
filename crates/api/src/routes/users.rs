//! User approval route handlers (owner only).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use postkasir_core::{ApprovalStatus, Role, StoreId, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// User as rendered in approval listings.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub store_id: Option<StoreId>,
    pub approval_status: ApprovalStatus,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email.into_inner(),
            name: user.name,
            role: user.role,
            store_id: user.store_id,
            approval_status: user.approval_status,
        }
    }
}

/// List pending users visible to the calling owner.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Json<Vec<UserSummary>>> {
    require_owner(&ctx)?;

    let users = UserRepository::new(state.pool())
        .list_pending(ctx.store_id)
        .await?;

    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

/// Approve a pending user into the caller's store.
pub async fn approve(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<UserSummary>> {
    let auth = AuthService::new(state.pool(), state.config().session_ttl);
    let user = auth.approve_user(&ctx, UserId::new(id)).await?;

    tracing::info!(user_id = %user.id, store_id = %ctx.store_id, "user approved");

    Ok(Json(UserSummary::from(user)))
}

/// Reject a pending user.
pub async fn reject(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<UserSummary>> {
    let auth = AuthService::new(state.pool(), state.config().session_ttl);
    let user = auth.reject_user(&ctx, UserId::new(id)).await?;

    tracing::info!(user_id = %user.id, "user rejected");

    Ok(Json(UserSummary::from(user)))
}

fn require_owner(ctx: &crate::models::AuthContext) -> Result<()> {
    if ctx.is_owner() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the store owner can manage approvals".to_string(),
        ))
    }
}
