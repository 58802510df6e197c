//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::ProductService;
use crate::config::Config;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the catalog service (which owns the product cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    catalog: ProductService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: Config, catalog: ProductService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &ProductService {
        &self.inner.catalog
    }
}
