//! Derived read views and the write path over the cached catalog.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, instrument};

use motorlane_core::fallback_categories;
use motorlane_core::{Category, Product, ProductId, ProductInput, ProductPatch, ValidationError};

use crate::store::{CatalogStore, StoreError};

use super::cache::{CacheStatus, ProductCache};

/// Default truncation for related-product lists.
pub const DEFAULT_RELATED_LIMIT: usize = 8;
/// Default truncation for on-sale lists.
pub const DEFAULT_SALE_LIMIT: usize = 4;

/// Failures surfaced by the write path. Read views never return errors;
/// they degrade to best-available data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A write payload failed validation; detected before any I/O.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The write target does not exist in the store.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The store rejected or failed the operation.
    #[error(transparent)]
    Store(StoreError),
}

impl CatalogError {
    fn from_store(err: StoreError, id: ProductId) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Catalog reads and writes, shared across all request handlers.
pub struct ProductService {
    store: Arc<dyn CatalogStore>,
    cache: ProductCache,
    point_timeout: Duration,
}

impl ProductService {
    #[must_use]
    pub fn new(
        store: Arc<dyn CatalogStore>,
        fetch_timeout: Duration,
        point_timeout: Duration,
    ) -> Self {
        let cache = ProductCache::new(Arc::clone(&store), fetch_timeout);
        Self {
            store,
            cache,
            point_timeout,
        }
    }

    // =========================================================================
    // Read views (cached snapshot only, never force a refresh)
    // =========================================================================

    /// The full catalog from the cached snapshot.
    pub async fn all(&self) -> Arc<Vec<Product>> {
        self.cache.load(false).await
    }

    /// Look up one product: cache scan first, then a direct point-query
    /// with the short timeout on a miss. Store failures on this read path
    /// degrade to `None`.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn by_id(&self, id: ProductId) -> Option<Product> {
        let products = self.cache.load(false).await;
        if let Some(product) = products.iter().find(|p| p.id == id) {
            return Some(product.clone());
        }

        match self.store.fetch_by_id(id, self.point_timeout).await {
            Ok(found) => found.map(|mut product| {
                product.normalize_kind();
                product
            }),
            Err(err) => {
                error!(error = %err, "point lookup failed");
                None
            }
        }
    }

    /// Products sharing `product`'s type, excluding the product itself.
    /// Cache order, truncated to `limit`.
    pub async fn related(&self, product: &Product, limit: usize) -> Vec<Product> {
        self.cache
            .load(false)
            .await
            .iter()
            .filter(|p| p.kind == product.kind && p.id != product.id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Products with an active sale price, truncated to `limit`.
    pub async fn on_sale(&self, limit: usize) -> Vec<Product> {
        self.cache
            .load(false)
            .await
            .iter()
            .filter(|p| p.is_on_sale())
            .take(limit)
            .cloned()
            .collect()
    }

    /// Distinct product types in first-occurrence order, each with display
    /// metadata and a product count. Falls back to a static list when the
    /// snapshot is empty.
    pub async fn categories(&self) -> Vec<Category> {
        let products = self.cache.load(false).await;
        if products.is_empty() {
            return fallback_categories();
        }

        let mut kinds: Vec<&str> = Vec::new();
        for product in products.iter() {
            if !product.kind.is_empty() && !kinds.contains(&product.kind.as_str()) {
                kinds.push(&product.kind);
            }
        }

        kinds
            .into_iter()
            .map(|kind| {
                let count = products.iter().filter(|p| p.kind == kind).count();
                Category::for_kind(kind, count)
            })
            .collect()
    }

    /// Distinct non-empty brands, lexicographically sorted.
    pub async fn brands(&self) -> Vec<String> {
        let products = self.cache.load(false).await;
        let mut brands: Vec<String> = products
            .iter()
            .filter_map(|p| p.brand.as_deref())
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        brands.sort();
        brands.dedup();
        brands
    }

    // =========================================================================
    // Write path (persist through the store, then invalidate)
    // =========================================================================

    /// Create a product. The store assigns the id; the cache is
    /// invalidated on success so the next read repopulates.
    ///
    /// # Errors
    ///
    /// `Validation` before any I/O; `Store` when the insert fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, mut input: ProductInput) -> Result<Product, CatalogError> {
        input.validate()?;
        input.derive_color_images()?;

        let product = self
            .store
            .insert(&input, self.point_timeout)
            .await
            .map_err(CatalogError::Store)?;

        self.cache.invalidate();
        Ok(product)
    }

    /// Shallow field replace of an existing product.
    ///
    /// # Errors
    ///
    /// `Validation` before any I/O; `NotFound` when no row matches;
    /// `Store` on any other failure.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update(
        &self,
        id: ProductId,
        mut patch: ProductPatch,
    ) -> Result<Product, CatalogError> {
        patch.validate()?;
        patch.derive_color_images()?;

        let product = self
            .store
            .update(id, &patch, self.point_timeout)
            .await
            .map_err(|e| CatalogError::from_store(e, id))?;

        self.cache.invalidate();
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing was deleted; `Store` on any other failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: ProductId) -> Result<(), CatalogError> {
        self.store
            .delete(id, self.point_timeout)
            .await
            .map_err(|e| CatalogError::from_store(e, id))?;

        self.cache.invalidate();
        Ok(())
    }

    // =========================================================================
    // Publish protocol
    // =========================================================================

    /// Force a full refresh ("go live" after a batch of edits).
    pub async fn refresh(&self) -> Arc<Vec<Product>> {
        self.cache.load(true).await
    }

    /// Clear the cache without repopulating.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Cache introspection for the admin dashboard.
    #[must_use]
    pub fn cache_status(&self) -> CacheStatus {
        self.cache.status()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use crate::catalog::cache::tests::product;
    use crate::store::mock::MockStore;

    use super::*;

    fn service_with(products: Vec<Product>) -> (Arc<MockStore>, ProductService) {
        let store = Arc::new(MockStore::with_products(products));
        let service = ProductService::new(
            Arc::clone(&store) as _,
            Duration::from_secs(30),
            Duration::from_secs(15),
        );
        (store, service)
    }

    #[tokio::test]
    async fn test_related_excludes_the_product_and_matches_type() {
        let (_, service) = service_with(vec![
            product(5, "suv", 100.0, None),
            product(6, "suv", 110.0, None),
            product(7, "sedan", 90.0, None),
            product(8, "suv", 120.0, None),
        ]);

        let anchor = service.by_id(ProductId::new(5)).await.unwrap();
        let related = service.related(&anchor, DEFAULT_RELATED_LIMIT).await;

        assert!(related.iter().all(|p| p.kind == "suv"));
        assert!(related.iter().all(|p| p.id != ProductId::new(5)));
        assert_eq!(related.len(), 2);
    }

    #[tokio::test]
    async fn test_related_respects_limit_and_cache_order() {
        let products: Vec<Product> = (1..=10).map(|id| product(id, "suv", 100.0, None)).collect();
        let (_, service) = service_with(products);

        let anchor = product(99, "suv", 100.0, None);
        let related = service.related(&anchor, DEFAULT_RELATED_LIMIT).await;

        let ids: Vec<i64> = related.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_on_sale_requires_positive_discounted_price() {
        let (_, service) = service_with(vec![
            product(1, "sedan", 100.0, Some(80.0)),
            product(2, "sedan", 100.0, None),
            product(3, "sedan", 100.0, Some(120.0)),
        ]);

        let sale = service.on_sale(DEFAULT_SALE_LIMIT).await;

        assert_eq!(sale.len(), 1);
        assert_eq!(sale[0].id, ProductId::new(1));
    }

    #[tokio::test]
    async fn test_categories_merge_case_variants_of_a_type() {
        let (_, service) = service_with(vec![
            product(1, "SUV", 100.0, None),
            product(2, "suv", 200.0, None),
        ]);

        let categories = service.categories().await;

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].key, "suv");
        assert_eq!(categories[0].count, 2);
    }

    #[tokio::test]
    async fn test_categories_preserve_first_occurrence_order() {
        let (_, service) = service_with(vec![
            product(1, "truck", 100.0, None),
            product(2, "sedan", 200.0, None),
            product(3, "truck", 300.0, None),
        ]);

        let keys: Vec<String> = service
            .categories()
            .await
            .into_iter()
            .map(|c| c.key)
            .collect();

        assert_eq!(keys, vec!["truck", "sedan"]);
    }

    #[tokio::test]
    async fn test_brands_are_distinct_and_sorted() {
        let mut products = vec![
            product(1, "sedan", 100.0, None),
            product(2, "suv", 200.0, None),
            product(3, "van", 300.0, None),
        ];
        products[0].brand = Some("Nissan".to_string());
        products[1].brand = Some("Honda".to_string());
        products[2].brand = Some("Nissan".to_string());
        let (_, service) = service_with(products);

        assert_eq!(service.brands().await, vec!["Honda", "Nissan"]);
    }

    #[tokio::test]
    async fn test_by_id_serves_from_cache_without_point_query() {
        let (store, service) = service_with(vec![product(1, "sedan", 100.0, None)]);

        let found = service.by_id(ProductId::new(1)).await;

        assert!(found.is_some());
        assert_eq!(store.fetch_by_id_calls(), 0);
    }

    #[tokio::test]
    async fn test_by_id_falls_through_to_point_query_on_cache_miss() {
        let (store, service) = service_with(vec![product(1, "sedan", 100.0, None)]);

        // Populate the cache, then add a row the snapshot does not know.
        service.all().await;
        let mut late = product(2, "SUV", 200.0, None);
        late.brand = Some("Kia".to_string());
        store.set_products(vec![product(1, "sedan", 100.0, None), late]);

        let found = service.by_id(ProductId::new(2)).await.unwrap();

        assert_eq!(store.fetch_by_id_calls(), 1);
        // Point-fetched records get the same normalization as cached ones.
        assert_eq!(found.kind, "suv");
    }

    #[tokio::test]
    async fn test_by_id_degrades_to_none_on_store_failure() {
        let (store, service) = service_with(vec![product(1, "sedan", 100.0, None)]);
        service.all().await;
        store.fail_reads(true);

        assert!(service.by_id(ProductId::new(99)).await.is_none());
    }

    #[tokio::test]
    async fn test_create_validates_before_any_store_call() {
        let (store, service) = service_with(vec![]);
        let input: ProductInput =
            serde_json::from_value(json!({"name": "", "price": 100.0, "type": "suv"})).unwrap();

        let err = service.create(input).await.unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(store.fetch_all_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_invalidates_cache_so_next_read_sees_the_product() {
        let (_, service) = service_with(vec![product(1, "sedan", 100.0, None)]);
        service.all().await;
        assert!(service.cache_status().populated);

        let input: ProductInput = serde_json::from_value(json!({
            "name": "Kia Sportage 2021",
            "price": 700_000.0,
            "type": "suv",
            "color_images": {"red": ["a.jpg", "b.jpg"], "blue": ["c.jpg"]},
        }))
        .unwrap();
        let created = service.create(input).await.unwrap();

        assert!(!service.cache_status().populated);
        assert_eq!(created.colors, vec!["red", "blue"]);
        assert_eq!(created.pictures, vec!["a.jpg", "b.jpg", "c.jpg"]);

        let all = service.all().await;
        assert!(all.iter().any(|p| p.id == created.id));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let (_, service) = service_with(vec![product(1, "sedan", 100.0, None)]);

        let err = service
            .update(ProductId::new(42), ProductPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(42)));
    }

    #[tokio::test]
    async fn test_update_recomputes_derived_fields_and_invalidates() {
        let (_, service) = service_with(vec![product(1, "sedan", 100.0, None)]);
        service.all().await;

        let patch: ProductPatch = serde_json::from_value(json!({
            "color_images": {"black": ["b.jpg"]},
        }))
        .unwrap();
        let updated = service.update(ProductId::new(1), patch).await.unwrap();

        assert_eq!(updated.colors, vec!["black"]);
        assert_eq!(updated.pictures, vec!["b.jpg"]);
        assert!(!service.cache_status().populated);
    }

    #[tokio::test]
    async fn test_remove_invalidates_and_missing_target_is_not_found() {
        let (_, service) = service_with(vec![product(1, "sedan", 100.0, None)]);
        service.all().await;

        service.remove(ProductId::new(1)).await.unwrap();
        assert!(!service.cache_status().populated);

        let err = service.remove(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_refresh_republishes_pending_writes() {
        let (store, service) = service_with(vec![product(1, "sedan", 100.0, None)]);
        let before = service.all().await;
        assert_eq!(before.len(), 1);

        store.set_products(vec![
            product(1, "sedan", 100.0, None),
            product(2, "suv", 200.0, None),
        ]);

        // Still the old generation until the operator republishes.
        assert_eq!(service.all().await.len(), 1);
        assert_eq!(service.refresh().await.len(), 2);
        assert_eq!(service.all().await.len(), 2);
    }
}
