//! Product route handlers (JSON API).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use motorlane_core::{Category, Product, ProductId, ProductInput, ProductPatch};

use crate::catalog::{DEFAULT_RELATED_LIMIT, DEFAULT_SALE_LIMIT};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Truncation query parameter for list views.
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Full catalog via the standard cached read. The public list never forces
/// a refresh; that belongs exclusively to the revalidation endpoint.
pub async fn index(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json((*state.catalog().all().await).clone())
}

/// Create a product and invalidate the cache.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Point read.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Shallow field replace and cache invalidation.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let product = state.catalog().update(id, patch).await?;
    Ok(Json(product))
}

/// Delete and cache invalidation.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    state.catalog().remove(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully"
    })))
}

/// Products of the same type, excluding the product itself. Empty when the
/// anchor product does not exist.
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Product>> {
    let limit = query.limit.unwrap_or(DEFAULT_RELATED_LIMIT);
    match state.catalog().by_id(id).await {
        Some(product) => Json(state.catalog().related(&product, limit).await),
        None => Json(Vec::new()),
    }
}

/// Products with an active sale price.
pub async fn on_sale(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Product>> {
    let limit = query.limit.unwrap_or(DEFAULT_SALE_LIMIT);
    Json(state.catalog().on_sale(limit).await)
}

/// Distinct categories with counts.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().categories().await)
}

/// Distinct brands, sorted.
pub async fn brands(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog().brands().await)
}
