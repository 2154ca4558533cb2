use storefront_core::error::{CatalogError, IndexError};
use storefront_core::search::QueryError;

/// Everything that can go wrong while serving a search.
///
/// Only [`StoreUnavailable`](Self::StoreUnavailable), the caller-input
/// variants and [`Cancelled`](Self::Cancelled) ever leave
/// [`SearchService`](crate::SearchService); the rest are logged and degrade
/// into a partial or empty response.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The store code did not resolve, or the directory could not be asked.
    #[error("merchant store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("malformed query: {0}")]
    MalformedQuery(String),

    #[error("invalid pagination: start={start}, max={max}")]
    InvalidPagination { start: i64, max: i64 },

    #[error("cannot encode query: {0}")]
    Encoding(String),

    #[error(transparent)]
    IndexUnavailable(#[from] IndexError),

    #[error(transparent)]
    CatalogLookup(#[from] CatalogError),

    /// A hit whose identifier is not a catalog id. Affects that hit only.
    #[error("index hit identifier '{0}' is not a catalog id")]
    IdentifierParse(String),

    #[error("search cancelled")]
    Cancelled,
}

impl From<QueryError> for SearchError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Malformed(msg) => Self::MalformedQuery(msg),
            QueryError::InvalidPagination { start, max } => Self::InvalidPagination { start, max },
            QueryError::Encoding(msg) => Self::Encoding(msg),
        }
    }
}
