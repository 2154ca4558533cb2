//! Repository for products.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::product::{ProductImageRow, ProductRow};

/// Provides batch product reads for search hydration.
pub struct ProductRepo;

impl ProductRepo {
    /// List the store's products whose id is in `ids`, described in
    /// `language_id`, in catalog order (`sort_order`, then `id`).
    ///
    /// With `available_only`, products flagged unavailable or with a future
    /// availability date are skipped. The first `start_index` matching rows are
    /// skipped and at most `max_count` are returned.
    pub async fn list_by_ids(
        pool: &PgPool,
        store_id: DbId,
        language_id: DbId,
        ids: &[DbId],
        available_only: bool,
        start_index: i64,
        max_count: i64,
    ) -> Result<Vec<ProductRow>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = "\
            SELECT p.id, p.sku, p.available, p.date_available, p.quantity, \
                   d.name, d.description, d.friendly_url, \
                   m.id AS manufacturer_id, m.code AS manufacturer_code, \
                   m.name AS manufacturer_name, \
                   pr.amount, pr.special_amount, pr.special_start, pr.special_end \
            FROM products p \
            JOIN product_descriptions d \
              ON d.product_id = p.id AND d.language_id = $2 \
            JOIN product_prices pr \
              ON pr.product_id = p.id AND pr.is_default \
            LEFT JOIN manufacturers m ON m.id = p.manufacturer_id \
            WHERE p.merchant_store_id = $1 \
              AND p.id = ANY($3) \
              AND (NOT $4 OR (p.available \
                   AND (p.date_available IS NULL OR p.date_available <= CURRENT_DATE))) \
            ORDER BY p.sort_order, p.id \
            LIMIT $5 OFFSET $6";

        sqlx::query_as::<_, ProductRow>(sql)
            .bind(store_id)
            .bind(language_id)
            .bind(ids)
            .bind(available_only)
            .bind(max_count)
            .bind(start_index)
            .fetch_all(pool)
            .await
    }

    /// List images for the given products, ordered per product by `sort_order`.
    pub async fn list_images(
        pool: &PgPool,
        product_ids: &[DbId],
    ) -> Result<Vec<ProductImageRow>, sqlx::Error> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = "\
            SELECT product_id, file_name, default_image \
            FROM product_images \
            WHERE product_id = ANY($1) \
            ORDER BY product_id, sort_order, id";

        sqlx::query_as::<_, ProductImageRow>(sql)
            .bind(product_ids)
            .fetch_all(pool)
            .await
    }
}
