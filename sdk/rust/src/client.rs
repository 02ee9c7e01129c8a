//! Typed HTTP client for the proxy's endpoints.

use catalog_proxy::catalog::{Category, Company, Product};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced to SDK callers.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport failure or undecodable body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with a non-2xx status.
    #[error("proxy returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Thin reqwest wrapper over the catalog proxy.
pub struct CatalogClient {
    client: Client,
    proxy_url: String,
}

impl CatalogClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    /// List all categories.
    pub async fn categories(&self) -> Result<Vec<Category>, SdkError> {
        self.get_json("/categories").await
    }

    /// List all companies.
    pub async fn companies(&self) -> Result<Vec<Company>, SdkError> {
        self.get_json("/companies").await
    }

    /// List products with no filters applied.
    pub async fn products(&self) -> Result<Vec<Product>, SdkError> {
        self.get_json("/products").await
    }

    /// Fetch products at a prebuilt path-and-query (see
    /// [`crate::aggregator::filter_url`]).
    pub async fn products_at(&self, path_and_query: &str) -> Result<Vec<Product>, SdkError> {
        self.get_json(path_and_query).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let response = self
            .client
            .get(format!("{}{}", self.proxy_url, path))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SdkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
