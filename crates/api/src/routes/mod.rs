pub mod health;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /search/{store}/{language}/autocomplete?q=       keyword suggestions (GET)
/// /search/{store}/{language}/{start}/{max}         faceted search (POST, raw query body)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/search", search::router())
}
