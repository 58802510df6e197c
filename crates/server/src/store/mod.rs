//! Remote product store access.
//!
//! The durable store is a remote relational table reached over HTTP
//! (Supabase PostgREST). Everything above this module talks to the
//! [`CatalogStore`] trait so the cache and service layers can be exercised
//! against an in-memory store in tests.
//!
//! Every call takes an explicit caller-supplied timeout; the store client
//! itself holds no timeout policy.

mod supabase;

#[cfg(test)]
pub mod mock;

pub use supabase::SupabaseStore;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use motorlane_core::{Product, ProductId, ProductInput, ProductPatch};

/// Errors from the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failure.
    #[error("store transport error: {0}")]
    Http(reqwest::Error),

    /// The call exceeded its timeout.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// The store answered with a non-success status.
    #[error("store returned {status}: {body}")]
    Unexpected {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("store response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The target row does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Classify a `reqwest` failure against the caller's timeout bound.
    fn from_request(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Http(err)
        }
    }
}

/// CRUD + filter access to the remote `products` table.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch every product, in stable id order.
    async fn fetch_all(&self, timeout: Duration) -> Result<Vec<Product>, StoreError>;

    /// Fetch a single product by id. `Ok(None)` when no row matches.
    async fn fetch_by_id(
        &self,
        id: ProductId,
        timeout: Duration,
    ) -> Result<Option<Product>, StoreError>;

    /// Insert a new row. The store assigns the id and returns the
    /// persisted record.
    async fn insert(&self, input: &ProductInput, timeout: Duration)
    -> Result<Product, StoreError>;

    /// Shallow field replace of an existing row. Fails with
    /// [`StoreError::NotFound`] when no row matches.
    async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        timeout: Duration,
    ) -> Result<Product, StoreError>;

    /// Delete a row by id. Fails with [`StoreError::NotFound`] when
    /// nothing was deleted.
    async fn delete(&self, id: ProductId, timeout: Duration) -> Result<(), StoreError>;
}
