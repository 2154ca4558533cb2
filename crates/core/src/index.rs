//! Search index hits, facet buckets and the index query interface.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::IndexError;

/// A single ranked match returned by the index.
///
/// The position of a hit in [`IndexResponse::hits`] is its rank; `score` is
/// informational only.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub id: String,
    pub score: f32,
}

/// One value bucket of a facet field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetBucket {
    pub field: String,
    pub key: String,
    pub name: String,
    pub count: i64,
}

/// Facet buckets grouped by facet field, each list in index order.
pub type FacetBuckets = BTreeMap<String, Vec<FacetBucket>>;

/// Everything the index returns for one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexResponse {
    pub hits: Vec<IndexHit>,
    pub facets: FacetBuckets,
}

/// A query in the index's own representation, addressed to a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NativeQuery {
    pub collection: String,
    pub body: serde_json::Value,
}

/// Index query interface.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Run a product search, returning ranked hits and facet buckets.
    async fn search(&self, query: &NativeQuery) -> Result<IndexResponse, IndexError>;

    /// Run a keyword lookup, returning suggestion strings in rank order.
    async fn autocomplete(&self, query: &NativeQuery) -> Result<Vec<String>, IndexError>;

    /// Cheap reachability probe used by the health endpoint.
    async fn ping(&self) -> bool;
}
