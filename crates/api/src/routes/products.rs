//! Product route handlers.
//!
//! All access is scoped by the caller's resolved `store_id`. A product id
//! belonging to another store is reported as not found, never as forbidden:
//! other tenants' data must not even be confirmed to exist.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use postkasir_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::state::AppState;

/// Product creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub price_cents: i64,
}

/// List the caller's store's products.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(ctx.store_id)
        .await?;

    Ok(Json(products))
}

/// Create a product in the caller's store.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    if body.name.trim().is_empty() || body.sku.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and sku must not be empty".to_string(),
        ));
    }
    if body.price_cents < 0 {
        return Err(AppError::BadRequest(
            "price_cents must not be negative".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .create(ctx.store_id, body.name.trim(), body.sku.trim(), body.price_cents)
        .await?;

    tracing::info!(product_id = %product.id, store_id = %ctx.store_id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a single product from the caller's store.
pub async fn get_one(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ctx.store_id, ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

    Ok(Json(product))
}
