//! REST client for the index `_search` endpoint.

use async_trait::async_trait;
use storefront_core::error::IndexError;
use storefront_core::index::{IndexResponse, NativeQuery, SearchIndex};

use crate::config::IndexConfig;
use crate::response;

/// HTTP client for a single index cluster.
pub struct IndexApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the index REST layer.
#[derive(Debug, thiserror::Error)]
pub enum IndexApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The index returned a non-2xx status code.
    #[error("index API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not in the expected shape.
    #[error("cannot decode index response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<IndexApiError> for IndexError {
    fn from(err: IndexApiError) -> Self {
        match err {
            IndexApiError::Decode(e) => IndexError::Decode(e.to_string()),
            other => IndexError::Unavailable(other.to_string()),
        }
    }
}

impl IndexApi {
    /// Create a client whose every request is bounded by `config.timeout`.
    pub fn new(config: &IndexConfig) -> Result<Self, IndexApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// `POST /{collection}/_search` with the query body, returning raw bytes.
    async fn post_search(&self, query: &NativeQuery) -> Result<Vec<u8>, IndexApiError> {
        let response = self
            .client
            .post(format!("{}/{}/_search", self.base_url, query.collection))
            .json(&query.body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Run a product search and decode hits and facet buckets.
    pub async fn search_products(&self, query: &NativeQuery) -> Result<IndexResponse, IndexApiError> {
        let body = self.post_search(query).await?;
        Ok(response::decode_search(&body)?)
    }

    /// Run a keyword search and decode suggestion strings.
    pub async fn search_keywords(&self, query: &NativeQuery) -> Result<Vec<String>, IndexApiError> {
        let body = self.post_search(query).await?;
        Ok(response::decode_keywords(&body)?)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, else capture the body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, IndexApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(IndexApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchIndex for IndexApi {
    async fn search(&self, query: &NativeQuery) -> Result<IndexResponse, IndexError> {
        Ok(self.search_products(query).await?)
    }

    async fn autocomplete(&self, query: &NativeQuery) -> Result<Vec<String>, IndexError> {
        Ok(self.search_keywords(query).await?)
    }

    async fn ping(&self) -> bool {
        match self.client.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "Search index ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn api_error_maps_to_unavailable() {
        let err = IndexApiError::ApiError {
            status: 404,
            body: "index_not_found_exception".to_string(),
        };
        let mapped = IndexError::from(err);
        assert_matches!(mapped, IndexError::Unavailable(msg) if msg.contains("404"));
    }

    #[test]
    fn decode_error_maps_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped = IndexError::from(IndexApiError::Decode(json_err));
        assert_matches!(mapped, IndexError::Decode(_));
    }
}
