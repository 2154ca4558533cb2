use std::sync::Arc;

use storefront_search::SearchService;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Search pipeline with its store, index and catalog collaborators.
    pub search: Arc<SearchService>,
    /// Cancelled when the server starts shutting down. Each request works
    /// under a child of this token.
    pub shutdown: CancellationToken,
}
