use axum::routing::{get, post};
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET    /{store}/{language}/autocomplete      autocomplete
/// POST   /{store}/{language}/{start}/{max}     search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{store}/{language}/autocomplete", get(search::autocomplete))
        .route("/{store}/{language}/{start}/{max}", post(search::search))
}
