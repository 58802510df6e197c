//! Product cache commands.
//!
//! Drives the server's revalidation endpoints, the same protocol the admin
//! dashboard uses after saving a product.
//!
//! # Environment Variables
//!
//! - `MOTORLANE_BASE_URL` - Server base URL (default: `http://127.0.0.1:3000`)

use serde_json::Value;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Errors that can occur while talking to the server.
#[derive(Debug, Error)]
pub enum CacheCommandError {
    /// Request failed to complete.
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("Server returned {status}: {body}")]
    Unexpected {
        status: reqwest::StatusCode,
        body: String,
    },
}

fn base_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("MOTORLANE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

async fn execute(request: reqwest::RequestBuilder) -> Result<Value, CacheCommandError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(CacheCommandError::Unexpected { status, body });
    }

    Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
}

fn report_cache(value: &Value) {
    let cache = &value["cache"];
    tracing::info!(
        "Cache: populated={} size={} ageMillis={} lastUpdated={}",
        cache["populated"],
        cache["size"],
        cache["ageMillis"],
        cache["lastUpdated"]
    );
}

/// Show the server's cache status.
pub async fn status() -> Result<(), CacheCommandError> {
    let url = format!("{}/revalidate", base_url());
    tracing::info!("Fetching cache status from {url}");

    let body = execute(reqwest::Client::new().get(&url)).await?;
    report_cache(&body);
    Ok(())
}

/// Force a refresh from the product store.
pub async fn refresh() -> Result<(), CacheCommandError> {
    let url = format!("{}/revalidate", base_url());
    tracing::info!("Requesting cache refresh at {url}");

    let body = execute(reqwest::Client::new().post(&url)).await?;
    tracing::info!(
        "Refresh complete: revalidated={} count={}",
        body["revalidated"],
        body["count"]
    );
    report_cache(&body);
    Ok(())
}

/// Clear the cache without repopulating.
pub async fn clear() -> Result<(), CacheCommandError> {
    let url = format!("{}/revalidate", base_url());
    tracing::info!("Clearing cache at {url}");

    let body = execute(reqwest::Client::new().delete(&url)).await?;
    report_cache(&body);
    Ok(())
}
