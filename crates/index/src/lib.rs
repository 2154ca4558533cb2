//! HTTP client for an Elasticsearch-compatible search index.
//!
//! [`IndexApi`] wraps the `_search` endpoint with [`reqwest`] and implements
//! [`storefront_core::index::SearchIndex`]; [`response`] holds the pure
//! decoders that turn index bodies into hits, facet buckets and keywords.

pub mod api;
pub mod config;
pub mod response;

pub use api::{IndexApi, IndexApiError};
pub use config::IndexConfig;
