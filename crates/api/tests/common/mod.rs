#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use storefront_core::images::ImagePaths;
use storefront_core::index::IndexResponse;
use storefront_search::memory::fixtures::{bucket, category, demo_store, english, hit, product};
use storefront_search::memory::{MemoryCatalog, MemoryIndex, MemoryStores};
use storefront_search::SearchService;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use storefront_api::config::ServerConfig;
use storefront_api::router::build_app_router;
use storefront_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        image_base_url: "https://cdn.example.com".to_string(),
        max_payload_bytes: 1024,
    }
}

/// The index answer for a "red shoes" query: three hits, one of them not a
/// catalog id, and a single category bucket.
pub fn red_shoes_index() -> MemoryIndex {
    MemoryIndex::new(IndexResponse {
        hits: vec![hit("12", 3.0), hit("abc", 2.0), hit("34", 1.0)],
        facets: [(
            "categories".to_string(),
            vec![bucket("categories", "shoes", 2)],
        )]
        .into_iter()
        .collect(),
    })
    .with_keywords(vec!["shoes".to_string(), "shorts".to_string()])
}

/// Catalog holding products 12 and 34 and the `shoes` category.
pub fn demo_catalog() -> MemoryCatalog {
    MemoryCatalog::new(
        vec![product(12, "Red runner", 5_000), product(34, "Red boot", 8_000)],
        vec![category(3, "shoes", "Shoes")],
    )
}

/// Build the full application router over in-memory collaborators.
///
/// Uses the production [`build_app_router`] so tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery).
pub fn build_test_app_with(index: MemoryIndex, catalog: MemoryCatalog) -> Router {
    build_test_app_with_shutdown(index, catalog, CancellationToken::new())
}

pub fn build_test_app_with_shutdown(
    index: MemoryIndex,
    catalog: MemoryCatalog,
    shutdown: CancellationToken,
) -> Router {
    build_test_app_from(test_config(), index, catalog, shutdown)
}

/// The "red shoes" app under a custom `ServerConfig`.
pub fn build_test_app_with_config(config: ServerConfig) -> Router {
    build_test_app_from(config, red_shoes_index(), demo_catalog(), CancellationToken::new())
}

fn build_test_app_from(
    config: ServerConfig,
    index: MemoryIndex,
    catalog: MemoryCatalog,
    shutdown: CancellationToken,
) -> Router {
    let search = SearchService::new(
        Arc::new(MemoryStores::new(vec![demo_store()], vec![english()])),
        Arc::new(index),
        Arc::new(catalog),
        ImagePaths::new(config.image_base_url.clone()),
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        search: Arc::new(search),
        shutdown,
    };

    build_app_router(state, &config)
}

/// The demo store with the "red shoes" index and catalog.
pub fn build_test_app() -> Router {
    build_test_app_with(red_shoes_index(), demo_catalog())
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body, as the search endpoint receives it.
pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
