//! Single-slot, read-through product cache with manual-only invalidation.
//!
//! The cache holds at most one generation of "all products" as an
//! immutable snapshot. Reads are served from memory until an operator
//! explicitly republishes (forced refresh) or clears the slot; there is no
//! TTL. On a failed or empty fetch the cache degrades: it serves the prior
//! snapshot when one exists, else the built-in fallback dataset, and never
//! surfaces the failure to the caller.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use motorlane_core::Product;
use motorlane_core::fallback::fallback_products;

use crate::store::{CatalogStore, StoreError};

/// One generation of the full catalog. The two fields always swap together
/// as a unit; readers can never observe one without the other.
#[derive(Clone)]
struct Snapshot {
    products: Arc<Vec<Product>>,
    populated_at: DateTime<Utc>,
}

/// Why a repopulating fetch produced no usable generation.
#[derive(Debug, Error)]
enum RefreshError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An empty read is indistinguishable from a truncated one; it is
    /// never published as a real generation.
    #[error("catalog fetch returned no rows")]
    EmptyResult,
}

/// Read-only cache introspection, exposed on the publish endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub populated: bool,
    pub size: usize,
    pub age_millis: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Process-wide cache of the full product collection.
pub struct ProductCache {
    store: Arc<dyn CatalogStore>,
    snapshot: RwLock<Option<Snapshot>>,
    /// Coalesces concurrent repopulating fetches: waiters re-check the
    /// slot after acquiring and reuse the winner's snapshot.
    refresh_guard: tokio::sync::Mutex<()>,
    fetch_timeout: Duration,
}

impl ProductCache {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, fetch_timeout: Duration) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
            refresh_guard: tokio::sync::Mutex::new(()),
            fetch_timeout,
        }
    }

    /// Return the full catalog, fetching from the store only when the
    /// cache is unpopulated or `force_refresh` is set.
    ///
    /// Never fails: fetch errors degrade to the prior snapshot when one
    /// exists, else to the built-in fallback dataset.
    pub async fn load(&self, force_refresh: bool) -> Arc<Vec<Product>> {
        if !force_refresh && let Some(snapshot) = self.current() {
            return snapshot.products;
        }

        let _guard = self.refresh_guard.lock().await;

        // Another task may have repopulated the slot while we waited.
        if !force_refresh && let Some(snapshot) = self.current() {
            return snapshot.products;
        }

        match self.refresh().await {
            Ok(products) => products,
            Err(err) => {
                error!(error = %err, "catalog fetch failed, serving best available data");
                self.current().map_or_else(
                    || Arc::new(fallback_products()),
                    |snapshot| snapshot.products,
                )
            }
        }
    }

    /// Fetch, normalize, and atomically swap in a new generation.
    async fn refresh(&self) -> Result<Arc<Vec<Product>>, RefreshError> {
        let mut products = self.store.fetch_all(self.fetch_timeout).await?;
        if products.is_empty() {
            return Err(RefreshError::EmptyResult);
        }

        for product in &mut products {
            product.normalize_kind();
        }

        let snapshot = Snapshot {
            products: Arc::new(products),
            populated_at: Utc::now(),
        };
        let products = Arc::clone(&snapshot.products);

        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);

        info!(size = products.len(), "catalog cache repopulated");
        Ok(products)
    }

    /// Clear the slot. The next read repopulates lazily. Idempotent.
    pub fn invalidate(&self) {
        self.snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!("catalog cache invalidated");
    }

    /// Read-only introspection; no side effects.
    #[must_use]
    pub fn status(&self) -> CacheStatus {
        self.current().map_or(
            CacheStatus {
                populated: false,
                size: 0,
                age_millis: None,
                last_updated: None,
            },
            |snapshot| CacheStatus {
                populated: true,
                size: snapshot.products.len(),
                age_millis: Some((Utc::now() - snapshot.populated_at).num_milliseconds()),
                last_updated: Some(snapshot.populated_at),
            },
        )
    }

    fn current(&self) -> Option<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
