//! Repository for categories.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::category::CategoryRow;

/// Provides lookups against `categories` joined with `category_descriptions`.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List the store's categories whose code is in `codes`, described in
    /// `language_id`. Categories without a description in that language are
    /// not returned.
    pub async fn list_by_codes(
        pool: &PgPool,
        store_id: DbId,
        codes: &[String],
        language_id: DbId,
    ) -> Result<Vec<CategoryRow>, sqlx::Error> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let sql = "\
            SELECT c.id, c.code, cd.name, cd.friendly_url, c.image, c.depth \
            FROM categories c \
            JOIN category_descriptions cd \
              ON cd.category_id = c.id AND cd.language_id = $2 \
            WHERE c.merchant_store_id = $1 \
              AND c.code = ANY($3) \
            ORDER BY c.sort_order, c.id";

        sqlx::query_as::<_, CategoryRow>(sql)
            .bind(store_id)
            .bind(language_id)
            .bind(codes)
            .fetch_all(pool)
            .await
    }
}
