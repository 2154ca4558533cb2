//! Decoders for index response bodies.
//!
//! Search bodies carry ranked hits under `hits.hits[]` and facet buckets under
//! `aggregations.<field>.buckets[]`; keyword bodies carry suggestions in
//! `hits.hits[]._source.keyword`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use storefront_core::index::{FacetBucket, FacetBuckets, IndexHit, IndexResponse};
use storefront_core::search::KEYWORD_FIELD;

#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: HitsEnvelope,
    #[serde(default)]
    aggregations: BTreeMap<String, Aggregation>,
}

#[derive(Debug, Default, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

/// Metric aggregations have no `buckets` and are skipped.
#[derive(Debug, Deserialize)]
struct Aggregation {
    #[serde(default)]
    buckets: Option<Vec<RawBucket>>,
}

#[derive(Debug, Deserialize)]
struct RawBucket {
    key: Value,
    doc_count: i64,
    #[serde(default)]
    name: Option<String>,
}

/// Decode a `_search` body into ranked hits and facet buckets.
pub fn decode_search(body: &[u8]) -> Result<IndexResponse, serde_json::Error> {
    let body: SearchBody = serde_json::from_slice(body)?;

    let hits = body
        .hits
        .hits
        .into_iter()
        .map(|hit| IndexHit {
            id: hit.id,
            score: hit.score.unwrap_or_default(),
        })
        .collect();

    let facets: FacetBuckets = body
        .aggregations
        .into_iter()
        .filter_map(|(field, aggregation)| {
            let buckets = aggregation.buckets?;
            let buckets = buckets
                .into_iter()
                .map(|bucket| {
                    let key = bucket_key(&bucket.key);
                    FacetBucket {
                        field: field.clone(),
                        name: bucket.name.unwrap_or_else(|| key.clone()),
                        key,
                        count: bucket.doc_count,
                    }
                })
                .collect();
            Some((field, buckets))
        })
        .collect();

    Ok(IndexResponse { hits, facets })
}

/// Decode a keyword `_search` body into suggestion strings, in rank order.
pub fn decode_keywords(body: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let body: SearchBody = serde_json::from_slice(body)?;

    Ok(body
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| {
            hit.source?
                .get(KEYWORD_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect())
}

/// Terms buckets key strings as strings and numbers as numbers.
fn bucket_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
