//! [`Catalog`] and [`StoreResolver`] backed by PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use storefront_core::catalog::{Catalog, Category, Product, ProductCriteria, ProductImage};
use storefront_core::error::CatalogError;
use storefront_core::store::{Language, MerchantStore, StoreResolver, DEFAULT_LANGUAGE};
use storefront_core::types::DbId;

use crate::models::product::ProductImageRow;
use crate::repositories::{CategoryRepo, LanguageRepo, ProductRepo, StoreRepo};

/// Catalog, store and language directory over one connection pool.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    /// `start_index` and `max_count` become the `OFFSET`/`LIMIT` of the
    /// batch, on top of the page the index already applied.
    async fn list_by_identifiers(
        &self,
        store: &MerchantStore,
        language: &Language,
        criteria: &ProductCriteria,
    ) -> Result<Vec<Product>, CatalogError> {
        let rows = ProductRepo::list_by_ids(
            &self.pool,
            store.id,
            language.id,
            &criteria.product_ids,
            criteria.available_only,
            criteria.start_index,
            criteria.max_count,
        )
        .await
        .map_err(CatalogError::backend)?;

        let ids: Vec<DbId> = rows.iter().map(|row| row.id).collect();
        let image_rows = ProductRepo::list_images(&self.pool, &ids)
            .await
            .map_err(CatalogError::backend)?;
        let mut images = group_images(image_rows);

        tracing::debug!(
            store = %store.code,
            requested = criteria.product_ids.len(),
            returned = rows.len(),
            start = criteria.start_index,
            "Listed products by identifiers",
        );

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_images = images.remove(&row.id).unwrap_or_default();
                row.into_product(product_images)
            })
            .collect())
    }

    async fn list_categories_by_codes(
        &self,
        store: &MerchantStore,
        codes: &[String],
        language: &Language,
    ) -> Result<Vec<Category>, CatalogError> {
        let rows = CategoryRepo::list_by_codes(&self.pool, store.id, codes, language.id)
            .await
            .map_err(CatalogError::backend)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}

#[async_trait]
impl StoreResolver for PgCatalog {
    async fn resolve_store(&self, code: &str) -> Result<Option<MerchantStore>, CatalogError> {
        let row = StoreRepo::find_by_code(&self.pool, code)
            .await
            .map_err(CatalogError::backend)?;

        Ok(row.map(MerchantStore::from))
    }

    async fn resolve_language(
        &self,
        store: &MerchantStore,
        code: &str,
    ) -> Result<Language, CatalogError> {
        for candidate in [code, store.default_language.as_str(), DEFAULT_LANGUAGE] {
            let row = LanguageRepo::find_by_code(&self.pool, candidate)
                .await
                .map_err(CatalogError::backend)?;

            if let Some(row) = row {
                if candidate != code {
                    tracing::debug!(requested = %code, using = %candidate, "Language fallback");
                }
                return Ok(row.into());
            }
        }

        Err(CatalogError::backend(format!(
            "no language found for '{code}' and no default language configured"
        )))
    }
}

/// Bucket image rows by product, keeping their query order.
fn group_images(rows: Vec<ProductImageRow>) -> HashMap<DbId, Vec<ProductImage>> {
    let mut grouped: HashMap<DbId, Vec<ProductImage>> = HashMap::new();
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row.into());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_row(product_id: DbId, file_name: &str) -> ProductImageRow {
        ProductImageRow {
            product_id,
            file_name: file_name.to_string(),
            default_image: false,
        }
    }

    #[test]
    fn group_images_buckets_by_product_in_order() {
        let grouped = group_images(vec![
            image_row(12, "a.jpg"),
            image_row(34, "x.jpg"),
            image_row(12, "b.jpg"),
        ]);

        let names: Vec<&str> = grouped[&12].iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg"]);
        assert_eq!(grouped[&34].len(), 1);
        assert!(!grouped.contains_key(&56));
    }
}
