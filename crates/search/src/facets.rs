//! Facet aggregation: raw index buckets to catalog-backed facet entries.

use std::collections::HashMap;

use storefront_core::catalog::Catalog;
use storefront_core::images::ImagePaths;
use storefront_core::index::{FacetBucket, FacetBuckets};
use storefront_core::search::{CATEGORY_FACET_NAME, MANUFACTURER_FACET_NAME};
use storefront_core::store::{Language, MerchantStore};

use crate::error::SearchError;
use crate::views::{EnrichedFacet, FacetMap, FacetType};

/// Per-call facet enrichment over one catalog.
pub struct FacetAggregator<'a> {
    catalog: &'a dyn Catalog,
    images: &'a ImagePaths,
}

impl<'a> FacetAggregator<'a> {
    pub fn new(catalog: &'a dyn Catalog, images: &'a ImagePaths) -> Self {
        Self { catalog, images }
    }

    /// Enrich every recognised, non-empty facet field in `raw`.
    ///
    /// Unknown fields are ignored. The result has one key per recognised
    /// field that carried buckets.
    pub async fn aggregate(
        &self,
        raw: &FacetBuckets,
        store: &MerchantStore,
        language: &Language,
    ) -> Result<FacetMap, SearchError> {
        let mut facets = FacetMap::new();

        for (field, buckets) in raw {
            if buckets.is_empty() {
                continue;
            }
            match field.as_str() {
                CATEGORY_FACET_NAME => {
                    let categories = self.categories(buckets, store, language).await?;
                    facets.insert(FacetType::Categories, categories);
                }
                MANUFACTURER_FACET_NAME => {
                    facets.insert(FacetType::Manufacturer, manufacturers(buckets));
                }
                other => tracing::trace!(field = %other, "Ignoring unrecognised facet field"),
            }
        }

        Ok(facets)
    }

    /// One batch category lookup for all bucket keys, counts matched by code.
    ///
    /// A category the catalog returns without a matching bucket is dropped
    /// and logged: every enriched entry stands for exactly one bucket.
    async fn categories(
        &self,
        buckets: &[FacetBucket],
        store: &MerchantStore,
        language: &Language,
    ) -> Result<Vec<EnrichedFacet>, SearchError> {
        let mut counts: HashMap<&str, i64> = HashMap::with_capacity(buckets.len());
        let mut codes = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            if !counts.contains_key(bucket.key.as_str()) {
                counts.insert(bucket.key.as_str(), bucket.count);
                codes.push(bucket.key.clone());
            }
        }

        let categories = self
            .catalog
            .list_categories_by_codes(store, &codes, language)
            .await?;

        Ok(categories
            .iter()
            .filter_map(|category| match counts.get(category.code.as_str()) {
                Some(&count) => Some(EnrichedFacet::from_category(
                    category,
                    store,
                    self.images,
                    Some(count),
                )),
                None => {
                    tracing::warn!(
                        store = %store.code,
                        code = %category.code,
                        "Category has no matching facet bucket",
                    );
                    None
                }
            })
            .collect())
    }
}

/// Manufacturer facets are not enriched yet; the field is reported with no
/// entries rather than guessing at a catalog mapping.
fn manufacturers(_buckets: &[FacetBucket]) -> Vec<EnrichedFacet> {
    Vec::new()
}
