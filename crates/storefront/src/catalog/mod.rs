//! Catalog REST API client.
//!
//! The catalog service is an external collaborator; this client passes
//! query parameters through verbatim and owns no search semantics. Listing
//! and detail responses are cached with `moka` (5-minute TTL).

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::CatalogConfig;
use types::{ProductDetail, ProductList};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog API returned an unexpected status code.
    #[error("Unexpected status {0} from catalog API")]
    Status(u16),
}

/// Listing query parameters, passed through to the API untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProductsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Listing(String),
    Detail(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Listing(ProductList),
    Detail(Box<ProductDetail>),
}

/// Client for the catalog REST API.
///
/// Cheaply cloneable; the HTTP client and cache are shared via `Arc`.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// List products, passing filters through to the API.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails or the response
    /// cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        params: &ListProductsParams,
    ) -> Result<ProductList, CatalogError> {
        let key = CacheKey::Listing(format!("{params:?}"));
        if let Some(CacheValue::Listing(list)) = self.inner.cache.get(&key).await {
            return Ok(list);
        }

        let url = format!("{}/v1/products", self.inner.base_url);
        let body = self.fetch(self.inner.client.get(&url).query(params)).await?;
        let list: ProductList = serde_json::from_str(&body)?;

        self.inner
            .cache
            .insert(key, CacheValue::Listing(list.clone()))
            .await;
        Ok(list)
    }

    /// Fetch one product by slug.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown slug, and other
    /// [`CatalogError`] variants for transport or decode failures.
    #[instrument(skip(self))]
    pub async fn get_product(&self, slug: &str) -> Result<ProductDetail, CatalogError> {
        let key = CacheKey::Detail(slug.to_string());
        if let Some(CacheValue::Detail(detail)) = self.inner.cache.get(&key).await {
            return Ok(*detail);
        }

        let url = format!("{}/v1/products/{slug}", self.inner.base_url);
        let body = match self.fetch(self.inner.client.get(&url)).await {
            Err(CatalogError::Status(404)) => {
                return Err(CatalogError::NotFound(slug.to_string()));
            }
            other => other?,
        };
        let detail: ProductDetail = serde_json::from_str(&body)?;

        self.inner
            .cache
            .insert(key, CacheValue::Detail(Box::new(detail.clone())))
            .await;
        Ok(detail)
    }

    /// Send a request and return the body text of a successful response.
    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<String, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
