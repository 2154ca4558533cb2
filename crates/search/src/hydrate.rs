//! Result hydration: ranked index hits to priced, localized product views.

use chrono::NaiveDate;
use storefront_core::catalog::{Catalog, ProductCriteria};
use storefront_core::images::ImagePaths;
use storefront_core::index::IndexHit;
use storefront_core::store::{Language, MerchantStore};
use storefront_core::types::DbId;

use crate::error::SearchError;
use crate::views::ReadableProduct;

/// Products for one page plus the count reported to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hydration {
    pub products: Vec<ReadableProduct>,
    /// Entries returned by the catalog batch, used verbatim as the product count.
    pub total: usize,
}

/// Per-call hydration over one catalog and image resolver.
pub struct Hydrator<'a> {
    catalog: &'a dyn Catalog,
    images: &'a ImagePaths,
    today: NaiveDate,
}

impl<'a> Hydrator<'a> {
    /// `today` decides which special prices are in effect.
    pub fn new(catalog: &'a dyn Catalog, images: &'a ImagePaths, today: NaiveDate) -> Self {
        Self {
            catalog,
            images,
            today,
        }
    }

    /// Expand `hits` into product views with one batch catalog lookup.
    ///
    /// Hits whose identifier is not a catalog id are dropped. Output follows
    /// the catalog's order, not the index ranking.
    pub async fn hydrate(
        &self,
        hits: &[IndexHit],
        store: &MerchantStore,
        language: &Language,
        start: i64,
        max: i64,
    ) -> Result<Hydration, SearchError> {
        let product_ids = extract_identifiers(hits);
        if product_ids.is_empty() {
            return Ok(Hydration::default());
        }

        let criteria = ProductCriteria {
            product_ids,
            start_index: start,
            max_count: max,
            available_only: true,
        };
        let products = self
            .catalog
            .list_by_identifiers(store, language, &criteria)
            .await?;

        let products: Vec<ReadableProduct> = products
            .iter()
            .map(|p| ReadableProduct::populate(p, store, language, self.images, self.today))
            .collect();

        Ok(Hydration {
            total: products.len(),
            products,
        })
    }
}

/// Catalog ids of `hits` in rank order, skipping any that do not parse.
pub fn extract_identifiers(hits: &[IndexHit]) -> Vec<DbId> {
    hits.iter()
        .filter_map(|hit| match parse_identifier(hit) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping index hit");
                None
            }
        })
        .collect()
}

pub fn parse_identifier(hit: &IndexHit) -> Result<DbId, SearchError> {
    hit.id
        .trim()
        .parse::<DbId>()
        .map_err(|_| SearchError::IdentifierParse(hit.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::fixtures::{demo_store, english, hit, product};
    use crate::memory::MemoryCatalog;
    use assert_matches::assert_matches;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    // -- identifiers ---------------------------------------------------------

    #[test]
    fn parse_identifier_accepts_integers() {
        assert_eq!(parse_identifier(&hit("34", 1.0)).unwrap(), 34);
    }

    #[test]
    fn parse_identifier_rejects_text() {
        assert_matches!(
            parse_identifier(&hit("abc", 1.0)),
            Err(SearchError::IdentifierParse(id)) if id == "abc"
        );
    }

    #[test]
    fn bad_identifier_does_not_affect_neighbours() {
        let hits = vec![hit("12", 3.0), hit("abc", 2.0), hit("34", 1.0), hit("", 0.5)];
        assert_eq!(extract_identifiers(&hits), vec![12, 34]);
    }

    // -- hydrate -------------------------------------------------------------

    #[tokio::test]
    async fn hydrate_issues_one_available_only_batch() {
        let catalog = MemoryCatalog::new(
            vec![product(12, "Red runner", 5_000), product(34, "Red boot", 8_000)],
            Vec::new(),
        );
        let images = ImagePaths::default();
        let hydrator = Hydrator::new(&catalog, &images, today());

        let hits = vec![hit("12", 3.0), hit("abc", 2.0), hit("34", 1.0)];
        let hydration = hydrator
            .hydrate(&hits, &demo_store(), &english(), 0, 10)
            .await
            .unwrap();

        assert_eq!(hydration.total, 2);
        assert_eq!(hydration.products.len(), 2);
        assert_eq!(hydration.products[0].price, "$50.00");

        let calls = catalog.product_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].product_ids, vec![12, 34]);
        assert_eq!(calls[0].start_index, 0);
        assert_eq!(calls[0].max_count, 10);
        assert!(calls[0].available_only);
    }

    #[tokio::test]
    async fn hydrate_keeps_catalog_order_over_rank() {
        // Catalog lists 34 before 12; the index ranked 12 first.
        let catalog = MemoryCatalog::new(
            vec![product(34, "Red boot", 8_000), product(12, "Red runner", 5_000)],
            Vec::new(),
        );
        let images = ImagePaths::default();
        let hydrator = Hydrator::new(&catalog, &images, today());

        let hydration = hydrator
            .hydrate(&[hit("12", 3.0), hit("34", 1.0)], &demo_store(), &english(), 0, 10)
            .await
            .unwrap();

        let ids: Vec<DbId> = hydration.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![34, 12]);
    }

    #[tokio::test]
    async fn hydrate_total_counts_returned_entries_only() {
        let mut hidden = product(34, "Discontinued", 1_000);
        hidden.available = false;
        let catalog = MemoryCatalog::new(vec![product(12, "Red runner", 5_000), hidden], Vec::new());
        let images = ImagePaths::default();
        let hydrator = Hydrator::new(&catalog, &images, today());

        let hydration = hydrator
            .hydrate(
                &[hit("12", 3.0), hit("34", 2.0), hit("56", 1.0)],
                &demo_store(),
                &english(),
                0,
                10,
            )
            .await
            .unwrap();

        assert_eq!(hydration.total, 1);
        assert_eq!(hydration.products.len(), hydration.total);
    }

    #[tokio::test]
    async fn hydrate_without_usable_ids_skips_catalog() {
        let catalog = MemoryCatalog::default();
        let images = ImagePaths::default();
        let hydrator = Hydrator::new(&catalog, &images, today());

        let hydration = hydrator
            .hydrate(&[hit("abc", 1.0)], &demo_store(), &english(), 0, 10)
            .await
            .unwrap();

        assert_eq!(hydration, Hydration::default());
        assert!(catalog.product_calls().is_empty());
    }

    #[tokio::test]
    async fn hydrate_surfaces_catalog_failure() {
        let catalog = MemoryCatalog::default().failing_products();
        let images = ImagePaths::default();
        let hydrator = Hydrator::new(&catalog, &images, today());

        let err = hydrator
            .hydrate(&[hit("12", 1.0)], &demo_store(), &english(), 0, 10)
            .await
            .unwrap_err();

        assert_matches!(err, SearchError::CatalogLookup(_));
    }
}
