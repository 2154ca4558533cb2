//! Handlers for the `/search` resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use storefront_core::error::CoreError;
use storefront_core::search::MAX_AUTOCOMPLETE_PREFIX_LEN;
use storefront_search::{KeywordSuggestions, SearchRequest, SearchResponse};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    /// Typed prefix; missing means empty.
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/search/{store}/{language}/autocomplete?q=
pub async fn autocomplete(
    State(state): State<AppState>,
    Path((store, language)): Path<(String, String)>,
    Query(params): Query<AutocompleteParams>,
) -> AppResult<Json<DataResponse<KeywordSuggestions>>> {
    if params.q.chars().count() > MAX_AUTOCOMPLETE_PREFIX_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "q must be at most {MAX_AUTOCOMPLETE_PREFIX_LEN} characters"
        ))));
    }

    let cancel = state.shutdown.child_token();
    let suggestions = state
        .search
        .autocomplete(&store, &language, &params.q, &cancel)
        .await?;

    Ok(Json(DataResponse { data: suggestions }))
}

/// POST /api/v1/search/{store}/{language}/{start}/{max}
///
/// The body is the raw query payload; an empty body matches everything.
pub async fn search(
    State(state): State<AppState>,
    Path((store, language, start, max)): Path<(String, String, i64, i64)>,
    body: Bytes,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    let request = SearchRequest {
        store_code: &store,
        language_code: &language,
        payload: &body,
        start,
        max,
    };

    let cancel = state.shutdown.child_token();
    let response = state.search.search(request, &cancel).await?;

    tracing::debug!(
        store = %store,
        language = %language,
        start,
        max,
        products = response.product_count,
        "Search served",
    );

    Ok(Json(DataResponse { data: response }))
}
