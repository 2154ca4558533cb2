use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storefront_core::error::CoreError;
use storefront_search::SearchError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent `{ "error", "code" }`
/// JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A request validation error from `storefront_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure reported by the search pipeline.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Search(err) => classify_search_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a search failure into an HTTP status, error code, and message.
///
/// - An unknown store and a cancelled request map to 503.
/// - Caller input defects map to 400.
/// - Anything else maps to 500 with a sanitized message.
fn classify_search_error(err: &SearchError) -> (StatusCode, &'static str, String) {
    match err {
        SearchError::StoreUnavailable(code) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            format!("Merchant store '{code}' is unavailable"),
        ),
        SearchError::MalformedQuery(msg) => {
            (StatusCode::BAD_REQUEST, "MALFORMED_QUERY", msg.clone())
        }
        SearchError::InvalidPagination { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_PAGINATION", err.to_string())
        }
        SearchError::Encoding(msg) => (StatusCode::BAD_REQUEST, "ENCODING_ERROR", msg.clone()),
        SearchError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "CANCELLED",
            "Request cancelled".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Search error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
