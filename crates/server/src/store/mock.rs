//! In-memory [`CatalogStore`] for unit tests: scripted rows, failure
//! injection, and call counters for asserting cache behavior.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use motorlane_core::{Product, ProductId, ProductInput, ProductPatch};

use super::{CatalogStore, StoreError};

#[derive(Default)]
pub struct MockStore {
    products: Mutex<Vec<Product>>,
    next_id: AtomicUsize,
    fail_reads: AtomicBool,
    time_out_reads: AtomicBool,
    fetch_all_calls: AtomicUsize,
    fetch_by_id_calls: AtomicUsize,
}

impl MockStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id.as_i64()).max().unwrap_or(0) + 1;
        let store = Self {
            products: Mutex::new(products),
            ..Self::default()
        };
        store.next_id.store(
            usize::try_from(next_id).unwrap(),
            Ordering::SeqCst,
        );
        store
    }

    pub fn set_products(&self, products: Vec<Product>) {
        *self.products.lock().unwrap() = products;
    }

    /// Make subsequent reads fail with a transport-style error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent reads fail as timeouts.
    pub fn time_out_reads(&self, time_out: bool) {
        self.time_out_reads.store(time_out, Ordering::SeqCst);
    }

    pub fn fetch_all_calls(&self) -> usize {
        self.fetch_all_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_by_id_calls(&self) -> usize {
        self.fetch_by_id_calls.load(Ordering::SeqCst)
    }

    fn read_failure(&self, timeout: Duration) -> Option<StoreError> {
        if self.time_out_reads.load(Ordering::SeqCst) {
            return Some(StoreError::Timeout(timeout));
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Some(StoreError::Unexpected {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "injected failure".to_string(),
            });
        }
        None
    }
}

/// Shallow field replace, mirroring what the remote store does with a
/// PATCH body.
fn apply_patch(product: &mut Product, patch: &ProductPatch) {
    let mut base = serde_json::to_value(&*product).unwrap();
    let overlay = serde_json::to_value(patch).unwrap();
    if let (Value::Object(base), Value::Object(overlay)) = (&mut base, overlay) {
        for (key, value) in overlay {
            base.insert(key, value);
        }
    }
    *product = serde_json::from_value(base).unwrap();
}

#[async_trait]
impl CatalogStore for MockStore {
    async fn fetch_all(&self, timeout: Duration) -> Result<Vec<Product>, StoreError> {
        self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure(timeout) {
            return Err(err);
        }
        Ok(self.products.lock().unwrap().clone())
    }

    async fn fetch_by_id(
        &self,
        id: ProductId,
        timeout: Duration,
    ) -> Result<Option<Product>, StoreError> {
        self.fetch_by_id_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.read_failure(timeout) {
            return Err(err);
        }
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert(
        &self,
        input: &ProductInput,
        _timeout: Duration,
    ) -> Result<Product, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut row = serde_json::to_value(input).unwrap();
        row.as_object_mut()
            .unwrap()
            .insert("id".to_string(), Value::from(id));
        let product: Product = serde_json::from_value(row).unwrap();
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        _timeout: Duration,
    ) -> Result<Product, StoreError> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;
        apply_patch(product, patch);
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId, _timeout: Duration) -> Result<(), StoreError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StoreError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}
