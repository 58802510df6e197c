//! Supabase (PostgREST) implementation of [`CatalogStore`].
//!
//! Speaks plain REST against `{url}/rest/v1/products` with the
//! service-role key in the `apikey` and `Authorization` headers. Every
//! request carries the caller-supplied timeout via `reqwest`'s per-request
//! timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tracing::instrument;

use motorlane_core::{Product, ProductId, ProductInput, ProductPatch};

use super::{CatalogStore, StoreError};
use crate::config::SupabaseConfig;

/// Projection for catalog reads. Matches the `Product` wire fields so a
/// schema change surfaces as a parse error here instead of silently
/// dropping data.
const PRODUCT_COLUMNS: &str = "id,name,price,newprice,type,brand,year,mileage,transmission,\
                               fuelType,engineSize,colors,color_images,pictures,sizes,\
                               description,features";

/// Client for the Supabase `products` table.
#[derive(Clone)]
pub struct SupabaseStore {
    inner: Arc<SupabaseStoreInner>,
}

struct SupabaseStoreInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SupabaseStore {
    /// Create a new store client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let endpoint = format!("{}/rest/v1/products", config.url.trim_end_matches('/'));

        Self {
            inner: Arc::new(SupabaseStoreInner {
                client: reqwest::Client::new(),
                endpoint,
                api_key: config.service_role_key.expose_secret().to_string(),
            }),
        }
    }

    fn request(&self, method: reqwest::Method, timeout: Duration) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, &self.inner.endpoint)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .timeout(timeout)
    }

    /// Send a request and return the success body as text.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<String, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::from_request(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::from_request(e, timeout))?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "store returned non-success status"
            );
            return Err(StoreError::Unexpected {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl CatalogStore for SupabaseStore {
    #[instrument(skip(self))]
    async fn fetch_all(&self, timeout: Duration) -> Result<Vec<Product>, StoreError> {
        let request = self
            .request(reqwest::Method::GET, timeout)
            .query(&[("select", PRODUCT_COLUMNS), ("order", "id.asc")]);

        let body = self.execute(request, timeout).await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn fetch_by_id(
        &self,
        id: ProductId,
        timeout: Duration,
    ) -> Result<Option<Product>, StoreError> {
        let request = self.request(reqwest::Method::GET, timeout).query(&[
            ("select", PRODUCT_COLUMNS),
            ("id", &format!("eq.{id}")),
            ("limit", "1"),
        ]);

        let body = self.execute(request, timeout).await?;
        let mut rows: Vec<Product> = serde_json::from_str(&body)?;
        Ok(rows.pop())
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn insert(
        &self,
        input: &ProductInput,
        timeout: Duration,
    ) -> Result<Product, StoreError> {
        let request = self
            .request(reqwest::Method::POST, timeout)
            .header("Prefer", "return=representation")
            .json(input);

        let body = self.execute(request, timeout).await?;
        let rows: Vec<Product> = serde_json::from_str(&body)?;
        rows.into_iter().next().ok_or(StoreError::Unexpected {
            status: StatusCode::OK,
            body: "insert returned no representation".to_string(),
        })
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        timeout: Duration,
    ) -> Result<Product, StoreError> {
        let request = self
            .request(reqwest::Method::PATCH, timeout)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))])
            .json(patch);

        let body = self.execute(request, timeout).await?;
        let rows: Vec<Product> = serde_json::from_str(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("product {id}")))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ProductId, timeout: Duration) -> Result<(), StoreError> {
        let request = self
            .request(reqwest::Method::DELETE, timeout)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))]);

        let body = self.execute(request, timeout).await?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}
