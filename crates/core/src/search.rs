//! Search constants and native query builders.
//!
//! Both builders are pure: they turn caller input into a [`NativeQuery`]
//! addressed to the store/language collection and never touch the index.

use serde_json::{json, Map, Value};

use crate::index::NativeQuery;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hard cap on autocomplete suggestions. Not caller-configurable.
pub const AUTOCOMPLETE_ENTRIES_COUNT: usize = 15;

/// Facet field holding category codes.
pub const CATEGORY_FACET_NAME: &str = "categories";

/// Facet field holding manufacturer codes.
pub const MANUFACTURER_FACET_NAME: &str = "manufacturer";

/// Longest prefix accepted by the autocomplete endpoint, in characters.
pub const MAX_AUTOCOMPLETE_PREFIX_LEN: usize = 128;

/// Index field autocomplete prefixes are matched against.
pub const KEYWORD_FIELD: &str = "keyword";

const PRODUCT_COLLECTION_PREFIX: &str = "product";
const KEYWORD_COLLECTION_PREFIX: &str = "keyword";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Caller input that cannot be turned into a native query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("malformed query: {0}")]
    Malformed(String),

    #[error("invalid pagination: start={start}, max={max}")]
    InvalidPagination { start: i64, max: i64 },

    #[error("cannot encode query: {0}")]
    Encoding(String),
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Product collection for a store/language pair, e.g. `product_en_demo`.
pub fn product_collection(store_code: &str, language_code: &str) -> String {
    collection_name(PRODUCT_COLLECTION_PREFIX, store_code, language_code)
}

/// Keyword collection for a store/language pair, e.g. `keyword_en_demo`.
pub fn keyword_collection(store_code: &str, language_code: &str) -> String {
    collection_name(KEYWORD_COLLECTION_PREFIX, store_code, language_code)
}

fn collection_name(prefix: &str, store_code: &str, language_code: &str) -> String {
    format!(
        "{prefix}_{}_{}",
        language_code.to_lowercase(),
        store_code.to_lowercase()
    )
}

// ---------------------------------------------------------------------------
// Autocomplete
// ---------------------------------------------------------------------------

/// Build a keyword suggestion query for a typed prefix.
///
/// The result size is fixed at [`AUTOCOMPLETE_ENTRIES_COUNT`]. A blank prefix
/// yields a `match_none` query rather than an error; the index answers it
/// with zero suggestions.
///
/// # Examples
///
/// ```
/// use storefront_core::search::build_autocomplete;
/// let query = build_autocomplete("demo", "en", "sh").unwrap();
/// assert_eq!(query.collection, "keyword_en_demo");
/// assert_eq!(query.body["size"], 15);
/// ```
pub fn build_autocomplete(
    store_code: &str,
    language_code: &str,
    prefix: &str,
) -> Result<NativeQuery, QueryError> {
    if let Some(c) = prefix.chars().find(|c| c.is_control() && !c.is_whitespace()) {
        return Err(QueryError::Encoding(format!(
            "prefix contains control character U+{:04X}",
            c as u32
        )));
    }

    let prefix = prefix.trim();
    let query = if prefix.is_empty() {
        json!({ "match_none": {} })
    } else {
        json!({ "match_phrase_prefix": { KEYWORD_FIELD: { "query": prefix } } })
    };

    Ok(NativeQuery {
        collection: keyword_collection(store_code, language_code),
        body: json!({
            "size": AUTOCOMPLETE_ENTRIES_COUNT,
            "_source": [KEYWORD_FIELD],
            "query": query,
        }),
    })
}

// ---------------------------------------------------------------------------
// Search request translation
// ---------------------------------------------------------------------------

/// Reject a pagination window with a negative offset or a non-positive size.
pub fn validate_pagination(start: i64, max: i64) -> Result<(), QueryError> {
    if start < 0 || max <= 0 {
        return Err(QueryError::InvalidPagination { start, max });
    }
    Ok(())
}

/// Parsed search payload: the top-level JSON object sent by the caller.
pub type SearchPayload = Map<String, Value>;

/// Parse a raw query payload without touching any collaborator.
///
/// A blank payload becomes a `match_all` query. Anything else must be a
/// UTF-8 JSON object.
pub fn parse_payload(raw: &[u8]) -> Result<SearchPayload, QueryError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| QueryError::Malformed(format!("payload is not valid UTF-8: {e}")))?;

    if text.trim().is_empty() {
        let mut body = Map::new();
        body.insert("query".into(), json!({ "match_all": {} }));
        return Ok(body);
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(QueryError::Malformed(
            "payload must be a JSON object".to_string(),
        )),
        Err(e) => Err(QueryError::Malformed(e.to_string())),
    }
}

/// Translate a parsed payload plus pagination window into a native query.
///
/// The payload is passed through as-is apart from `from`/`size`, which are
/// overwritten with the window, and default facet aggregations, which are
/// added only when the payload requests none. Filter and sort field names are
/// left for the index to judge.
pub fn translate(
    store_code: &str,
    language_code: &str,
    payload: SearchPayload,
    start: i64,
    max: i64,
) -> Result<NativeQuery, QueryError> {
    validate_pagination(start, max)?;

    let mut body = payload;
    body.insert("from".into(), json!(start));
    body.insert("size".into(), json!(max));

    if !body.contains_key("aggs") && !body.contains_key("aggregations") {
        body.insert("aggs".into(), default_facet_aggregations());
    }

    Ok(NativeQuery {
        collection: product_collection(store_code, language_code),
        body: Value::Object(body),
    })
}

/// Terms aggregations for every first-class facet field.
fn default_facet_aggregations() -> Value {
    json!({
        CATEGORY_FACET_NAME: { "terms": { "field": CATEGORY_FACET_NAME } },
        MANUFACTURER_FACET_NAME: { "terms": { "field": MANUFACTURER_FACET_NAME } },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
