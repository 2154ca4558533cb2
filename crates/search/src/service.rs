//! Search orchestration.
//!
//! [`SearchService::search`] walks one request through
//! `Idle -> StoreResolving -> Querying -> Hydrating -> Aggregating -> Done`,
//! with `Aborted` reachable from every stage. Caller input is checked before
//! any collaborator is called. The cancellation token is checked at each
//! transition; hydration and aggregation read the same index response and
//! each degrades on its own.

use std::sync::Arc;

use storefront_core::catalog::Catalog;
use storefront_core::images::ImagePaths;
use storefront_core::index::SearchIndex;
use storefront_core::search::{self, AUTOCOMPLETE_ENTRIES_COUNT};
use storefront_core::store::{Language, MerchantStore, StoreResolver};
use tokio_util::sync::CancellationToken;

use crate::error::SearchError;
use crate::facets::FacetAggregator;
use crate::hydrate::{Hydration, Hydrator};
use crate::views::{FacetMap, KeywordSuggestions, SearchResponse};

/// Where a request is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Idle,
    StoreResolving,
    Querying,
    Hydrating,
    Aggregating,
    Done,
    Aborted,
}

/// One search request as received from the caller.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub store_code: &'a str,
    pub language_code: &'a str,
    /// Raw query payload, passed to the index largely untouched.
    pub payload: &'a [u8],
    pub start: i64,
    pub max: i64,
}

/// Stage bookkeeping for a single request.
struct StageTracker<'a> {
    stage: SearchStage,
    cancel: &'a CancellationToken,
}

impl<'a> StageTracker<'a> {
    fn new(cancel: &'a CancellationToken) -> Self {
        Self {
            stage: SearchStage::Idle,
            cancel,
        }
    }

    /// Move to `next` unless the request has been cancelled.
    fn advance(&mut self, next: SearchStage) -> Result<(), SearchError> {
        if self.cancel.is_cancelled() {
            self.abort(&SearchError::Cancelled);
            return Err(SearchError::Cancelled);
        }
        tracing::debug!(from = ?self.stage, to = ?next, "Search stage");
        self.stage = next;
        Ok(())
    }

    fn abort(&mut self, reason: &SearchError) {
        tracing::debug!(from = ?self.stage, reason = %reason, "Search aborted");
        self.stage = SearchStage::Aborted;
    }

    /// Record `err` as the reason for aborting and hand it back.
    fn fail(&mut self, err: SearchError) -> SearchError {
        self.abort(&err);
        err
    }
}

/// Entry point for storefront searches.
///
/// Collaborators are injected so the same pipeline runs against PostgreSQL
/// and a live index in production and in-memory fakes in tests.
pub struct SearchService {
    stores: Arc<dyn StoreResolver>,
    index: Arc<dyn SearchIndex>,
    catalog: Arc<dyn Catalog>,
    images: ImagePaths,
}

impl SearchService {
    pub fn new(
        stores: Arc<dyn StoreResolver>,
        index: Arc<dyn SearchIndex>,
        catalog: Arc<dyn Catalog>,
        images: ImagePaths,
    ) -> Self {
        Self {
            stores,
            index,
            catalog,
            images,
        }
    }

    /// Run a faceted search.
    ///
    /// Errors only for an unknown store, bad caller input or cancellation.
    /// An index failure yields an empty response; a catalog failure empties
    /// only the products or only the facets.
    pub async fn search(
        &self,
        request: SearchRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, SearchError> {
        let mut stage = StageTracker::new(cancel);

        search::validate_pagination(request.start, request.max)
            .map_err(|e| stage.fail(e.into()))?;
        let payload = search::parse_payload(request.payload).map_err(|e| stage.fail(e.into()))?;

        stage.advance(SearchStage::StoreResolving)?;
        let (store, language) = self
            .resolve_context(request.store_code, request.language_code)
            .await
            .map_err(|e| stage.fail(e))?;

        stage.advance(SearchStage::Querying)?;
        let query = search::translate(
            &store.code,
            &language.code,
            payload,
            request.start,
            request.max,
        )
        .map_err(|e| stage.fail(e.into()))?;

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return Err(stage.fail(SearchError::Cancelled)),
            outcome = self.index.search(&query) => outcome,
        };
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    store = %store.code,
                    collection = %query.collection,
                    query = %query.body,
                    "Index search failed",
                );
                stage.abort(&SearchError::IndexUnavailable(e));
                return Ok(SearchResponse::default());
            }
        };

        tracing::debug!(
            store = %store.code,
            hits = response.hits.len(),
            facet_fields = response.facets.len(),
            "Index answered",
        );

        stage.advance(SearchStage::Hydrating)?;
        let today = chrono::Utc::now().date_naive();
        let hydration = Hydrator::new(self.catalog.as_ref(), &self.images, today)
            .hydrate(&response.hits, &store, &language, request.start, request.max)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, store = %store.code, "Hydration failed, returning no products");
                Hydration::default()
            });

        stage.advance(SearchStage::Aggregating)?;
        let facets = FacetAggregator::new(self.catalog.as_ref(), &self.images)
            .aggregate(&response.facets, &store, &language)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, store = %store.code, "Facet aggregation failed, returning no facets");
                FacetMap::new()
            });

        stage.advance(SearchStage::Done)?;
        Ok(SearchResponse {
            products: hydration.products,
            product_count: hydration.total,
            facets,
        })
    }

    /// Suggest up to [`AUTOCOMPLETE_ENTRIES_COUNT`] keywords for a prefix.
    ///
    /// An index failure yields no suggestions.
    pub async fn autocomplete(
        &self,
        store_code: &str,
        language_code: &str,
        prefix: &str,
        cancel: &CancellationToken,
    ) -> Result<KeywordSuggestions, SearchError> {
        let mut stage = StageTracker::new(cancel);

        stage.advance(SearchStage::StoreResolving)?;
        let (store, language) = self
            .resolve_context(store_code, language_code)
            .await
            .map_err(|e| stage.fail(e))?;

        stage.advance(SearchStage::Querying)?;
        let query = search::build_autocomplete(&store.code, &language.code, prefix)
            .map_err(|e| stage.fail(e.into()))?;

        let outcome = tokio::select! {
            _ = cancel.cancelled() => return Err(stage.fail(SearchError::Cancelled)),
            outcome = self.index.autocomplete(&query) => outcome,
        };
        let mut keywords = outcome.unwrap_or_else(|e| {
            tracing::error!(
                error = %e,
                collection = %query.collection,
                query = %query.body,
                "Keyword search failed",
            );
            Vec::new()
        });
        keywords.truncate(AUTOCOMPLETE_ENTRIES_COUNT);

        stage.advance(SearchStage::Done)?;
        Ok(KeywordSuggestions { keywords })
    }

    /// Whether the index answers a ping.
    pub async fn index_healthy(&self) -> bool {
        self.index.ping().await
    }

    /// Resolve store then language. Any failure, including a backend error,
    /// is reported as the store being unavailable.
    async fn resolve_context(
        &self,
        store_code: &str,
        language_code: &str,
    ) -> Result<(MerchantStore, Language), SearchError> {
        let store = match self.stores.resolve_store(store_code).await {
            Ok(Some(store)) => store,
            Ok(None) => {
                tracing::error!(store = %store_code, "Merchant store not found");
                return Err(SearchError::StoreUnavailable(store_code.to_string()));
            }
            Err(e) => {
                tracing::error!(error = %e, store = %store_code, "Merchant store lookup failed");
                return Err(SearchError::StoreUnavailable(store_code.to_string()));
            }
        };

        let language = self
            .stores
            .resolve_language(&store, language_code)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    store = %store_code,
                    language = %language_code,
                    "Language lookup failed",
                );
                SearchError::StoreUnavailable(store_code.to_string())
            })?;

        Ok((store, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::fixtures::{bucket, category, demo_store, english, hit, product};
    use crate::memory::{MemoryCatalog, MemoryIndex, MemoryStores};
    use crate::views::FacetType;
    use assert_matches::assert_matches;
    use storefront_core::index::IndexResponse;

    fn red_shoes_response() -> IndexResponse {
        IndexResponse {
            hits: vec![hit("12", 3.0), hit("abc", 2.0), hit("34", 1.0)],
            facets: [(
                "categories".to_string(),
                vec![bucket("categories", "shoes", 2)],
            )]
            .into_iter()
            .collect(),
        }
    }

    fn demo_catalog() -> MemoryCatalog {
        MemoryCatalog::new(
            vec![product(12, "Red runner", 5_000), product(34, "Red boot", 8_000)],
            vec![category(3, "shoes", "Shoes")],
        )
    }

    fn demo_stores() -> Arc<MemoryStores> {
        Arc::new(MemoryStores::new(vec![demo_store()], vec![english()]))
    }

    fn service(index: Arc<MemoryIndex>, catalog: Arc<MemoryCatalog>) -> SearchService {
        SearchService::new(demo_stores(), index, catalog, ImagePaths::default())
    }

    fn request(payload: &[u8]) -> SearchRequest<'_> {
        SearchRequest {
            store_code: "demo",
            language_code: "en",
            payload,
            start: 0,
            max: 10,
        }
    }

    const RED_SHOES: &[u8] = br#"{"query":{"match":{"name":"red shoes"}}}"#;

    // -- happy path ----------------------------------------------------------

    #[tokio::test]
    async fn red_shoes_scenario() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let catalog = Arc::new(demo_catalog());
        let service = service(index.clone(), catalog.clone());

        let response = service
            .search(request(RED_SHOES), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.products.len(), 2);
        assert_eq!(response.product_count, 2);
        let categories = &response.facets[&FacetType::Categories];
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].code, "shoes");
        assert_eq!(categories[0].product_count, Some(2));

        assert_eq!(catalog.product_calls()[0].product_ids, vec![12, 34]);
        let queries = index.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].collection, "product_en_demo");
        assert_eq!(queries[0].body["size"], 10);
    }

    #[tokio::test]
    async fn product_count_ignores_raw_hit_count() {
        let mut response = red_shoes_response();
        response.hits.push(hit("99", 0.1));
        let service = service(Arc::new(MemoryIndex::new(response)), Arc::new(demo_catalog()));

        let response = service
            .search(request(b""), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.product_count, response.products.len());
        assert_eq!(response.product_count, 2);
    }

    #[tokio::test]
    async fn unknown_language_falls_back_to_store_default() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let service = service(index.clone(), Arc::new(demo_catalog()));
        let mut req = request(RED_SHOES);
        req.language_code = "xx";

        service.search(req, &CancellationToken::new()).await.unwrap();

        assert_eq!(index.queries()[0].collection, "product_en_demo");
    }

    // -- caller errors -------------------------------------------------------

    #[tokio::test]
    async fn unknown_store_is_unavailable() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let service = service(index.clone(), Arc::new(demo_catalog()));
        let mut req = request(RED_SHOES);
        req.store_code = "nowhere";

        let err = service.search(req, &CancellationToken::new()).await.unwrap_err();

        assert_matches!(err, SearchError::StoreUnavailable(code) if code == "nowhere");
        assert!(index.queries().is_empty());
    }

    #[tokio::test]
    async fn store_backend_failure_is_unavailable() {
        let service = SearchService::new(
            Arc::new(MemoryStores::failing()),
            Arc::new(MemoryIndex::new(red_shoes_response())),
            Arc::new(demo_catalog()),
            ImagePaths::default(),
        );

        let err = service
            .search(request(RED_SHOES), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_matches!(err, SearchError::StoreUnavailable(_));
    }

    #[tokio::test]
    async fn bad_pagination_stops_before_any_call() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let service = service(index.clone(), Arc::new(demo_catalog()));
        let mut req = request(RED_SHOES);
        req.max = 0;

        let err = service.search(req, &CancellationToken::new()).await.unwrap_err();

        assert_matches!(err, SearchError::InvalidPagination { start: 0, max: 0 });
        assert!(index.queries().is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_never_reaches_index() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let service = service(index.clone(), Arc::new(demo_catalog()));

        let err = service
            .search(request(b"{not json"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_matches!(err, SearchError::MalformedQuery(_));
        assert!(index.queries().is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_before_store_lookup() {
        let service = SearchService::new(
            Arc::new(MemoryStores::failing()),
            Arc::new(MemoryIndex::new(red_shoes_response())),
            Arc::new(demo_catalog()),
            ImagePaths::default(),
        );

        let err = service
            .search(request(b"{not json"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_matches!(err, SearchError::MalformedQuery(_));
    }

    // -- pagination ----------------------------------------------------------

    #[tokio::test]
    async fn start_offsets_the_catalog_batch() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let catalog = Arc::new(demo_catalog());
        let service = service(index.clone(), catalog.clone());
        let mut req = request(RED_SHOES);
        req.start = 1;

        let response = service.search(req, &CancellationToken::new()).await.unwrap();

        assert_eq!(index.queries()[0].body["from"], 1);
        let calls = catalog.product_calls();
        assert_eq!(calls[0].start_index, 1);
        assert_eq!(calls[0].max_count, 10);

        let ids: Vec<i64> = response.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![34]);
        assert_eq!(response.product_count, 1);
    }

    // -- degradation ---------------------------------------------------------

    #[tokio::test]
    async fn index_failure_returns_empty_response() {
        let catalog = Arc::new(demo_catalog());
        let service = service(Arc::new(MemoryIndex::failing()), catalog.clone());

        let response = service
            .search(request(RED_SHOES), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response, SearchResponse::default());
        assert!(catalog.product_calls().is_empty());
        assert!(catalog.category_calls().is_empty());
    }

    #[tokio::test]
    async fn product_lookup_failure_keeps_facets() {
        let catalog = Arc::new(demo_catalog().failing_products());
        let service = service(Arc::new(MemoryIndex::new(red_shoes_response())), catalog);

        let response = service
            .search(request(RED_SHOES), &CancellationToken::new())
            .await
            .unwrap();

        assert!(response.products.is_empty());
        assert_eq!(response.product_count, 0);
        assert_eq!(response.facets[&FacetType::Categories].len(), 1);
    }

    #[tokio::test]
    async fn category_lookup_failure_keeps_products() {
        let catalog = Arc::new(demo_catalog().failing_categories());
        let service = service(Arc::new(MemoryIndex::new(red_shoes_response())), catalog);

        let response = service
            .search(request(RED_SHOES), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(response.product_count, 2);
        assert!(response.facets.is_empty());
    }

    // -- cancellation --------------------------------------------------------

    #[tokio::test]
    async fn cancelled_before_start_does_nothing() {
        let index = Arc::new(MemoryIndex::new(red_shoes_response()));
        let service = service(index.clone(), Arc::new(demo_catalog()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service.search(request(RED_SHOES), &cancel).await.unwrap_err();

        assert_matches!(err, SearchError::Cancelled);
        assert!(index.queries().is_empty());
    }

    #[tokio::test]
    async fn cancel_during_index_call_skips_hydration() {
        let catalog = Arc::new(demo_catalog());
        let service = service(Arc::new(MemoryIndex::hanging()), catalog.clone());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = service.search(request(RED_SHOES), &cancel).await.unwrap_err();

        assert_matches!(err, SearchError::Cancelled);
        assert!(catalog.product_calls().is_empty());
        assert!(catalog.category_calls().is_empty());
    }

    #[tokio::test]
    async fn cancel_after_hydration_skips_aggregation() {
        let cancel = CancellationToken::new();
        let catalog = Arc::new(demo_catalog().cancelling_after_products(cancel.clone()));
        let service = service(Arc::new(MemoryIndex::new(red_shoes_response())), catalog.clone());

        let err = service.search(request(RED_SHOES), &cancel).await.unwrap_err();

        assert_matches!(err, SearchError::Cancelled);
        assert_eq!(catalog.product_calls().len(), 1);
        assert!(catalog.category_calls().is_empty());
    }

    // -- autocomplete --------------------------------------------------------

    #[tokio::test]
    async fn autocomplete_caps_suggestions() {
        let keywords: Vec<String> = (0..40).map(|i| format!("shoe {i}")).collect();
        let index = Arc::new(MemoryIndex::new(IndexResponse::default()).with_keywords(keywords));
        let service = service(index.clone(), Arc::new(demo_catalog()));

        let suggestions = service
            .autocomplete("demo", "en", "sh", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(suggestions.keywords.len(), AUTOCOMPLETE_ENTRIES_COUNT);
        assert_eq!(suggestions.keywords[0], "shoe 0");
        assert_eq!(index.queries()[0].collection, "keyword_en_demo");
    }

    #[tokio::test]
    async fn autocomplete_index_failure_is_empty() {
        let service = service(Arc::new(MemoryIndex::failing()), Arc::new(demo_catalog()));

        let suggestions = service
            .autocomplete("demo", "en", "sh", &CancellationToken::new())
            .await
            .unwrap();

        assert!(suggestions.keywords.is_empty());
    }

    #[tokio::test]
    async fn autocomplete_unknown_store_is_unavailable() {
        let service = service(Arc::new(MemoryIndex::default()), Arc::new(demo_catalog()));

        let err = service
            .autocomplete("nowhere", "en", "sh", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_matches!(err, SearchError::StoreUnavailable(_));
    }

    // -- stage tracker -------------------------------------------------------

    #[test]
    fn tracker_aborts_when_cancelled() {
        let cancel = CancellationToken::new();
        let mut stage = StageTracker::new(&cancel);
        stage.advance(SearchStage::StoreResolving).unwrap();
        assert_eq!(stage.stage, SearchStage::StoreResolving);

        cancel.cancel();
        assert_matches!(stage.advance(SearchStage::Querying), Err(SearchError::Cancelled));
        assert_eq!(stage.stage, SearchStage::Aborted);
    }
}
