//! The catalog layer: the product cache and the views derived from it.
//!
//! Reads are pure functions of the cache's current snapshot. Writes bypass
//! the cache for persistence and invalidate it afterwards; persisted
//! changes become visible to storefront readers only when an operator
//! republishes (see the `/revalidate` routes).

mod cache;
mod service;

pub use cache::{CacheStatus, ProductCache};
pub use service::{CatalogError, DEFAULT_RELATED_LIMIT, DEFAULT_SALE_LIMIT, ProductService};
