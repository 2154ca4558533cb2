//! Faceted search orchestration.
//!
//! Sequences one storefront search: resolve the store context, translate the
//! caller's query, ask the index, then hydrate hits into priced product views
//! and enrich facet buckets into client-ready entries.
//!
//! - [`service`]: the [`SearchService`] entry point and its stage machine.
//! - [`hydrate`]: index hits to catalog products to [`ReadableProduct`]s.
//! - [`facets`]: facet buckets to [`EnrichedFacet`]s.
//! - [`views`]: the serializable response shapes.

pub mod error;
pub mod facets;
pub mod hydrate;
pub mod service;
pub mod views;

#[cfg(any(test, feature = "testing"))]
pub mod memory;

pub use error::SearchError;
pub use service::{SearchRequest, SearchService, SearchStage};
pub use views::{
    EnrichedFacet, FacetMap, FacetType, KeywordSuggestions, ReadableProduct, SearchResponse,
};
