//! The manual publish protocol, consumed by the admin dashboard.
//!
//! Writes persist to the store immediately, but the public catalog changes
//! only when the operator republishes through these endpoints.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::CacheStatus;
use crate::state::AppState;

/// Advisory metadata sent by the admin UI alongside a forced refresh.
/// Echoed back for the page-cache layer; the product cache does not
/// interpret it.
#[derive(Debug, Default, Deserialize)]
pub struct RevalidateRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(rename = "productId", default)]
    pub product_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub cache: CacheStatus,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub revalidated: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>,
    pub cache: CacheStatus,
}

/// Cache introspection for the dashboard header.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        cache: state.catalog().cache_status(),
    })
}

/// Force a full refresh and report the new size ("go live").
pub async fn refresh(
    State(state): State<AppState>,
    body: Option<Json<RevalidateRequest>>,
) -> Json<RefreshResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let products = state.catalog().refresh().await;
    let cache = state.catalog().cache_status();

    Json(RefreshResponse {
        success: true,
        // A failed refresh degrades to stale or fallback data; only a
        // populated slot counts as republished.
        revalidated: cache.populated,
        count: products.len(),
        action: request.action,
        paths: request.paths,
        product_id: request.product_id,
        cache,
    })
}

/// Clear the cache without repopulating; the next read repopulates lazily.
pub async fn clear(State(state): State<AppState>) -> Json<StatusResponse> {
    state.catalog().invalidate();
    Json(StatusResponse {
        success: true,
        cache: state.catalog().cache_status(),
    })
}
