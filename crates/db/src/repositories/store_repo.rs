//! Repository for merchant stores.

use sqlx::PgPool;

use crate::models::store::MerchantStoreRow;

/// Provides lookups against the `merchant_stores` table.
pub struct StoreRepo;

impl StoreRepo {
    /// Find a store by its code, joined with its default language code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<MerchantStoreRow>, sqlx::Error> {
        let sql = "\
            SELECT s.id, s.code, s.name, s.currency_code, s.currency_symbol, \
                   s.currency_format_national, l.code AS default_language \
            FROM merchant_stores s \
            JOIN languages l ON l.id = s.default_language_id \
            WHERE s.code = $1";

        sqlx::query_as::<_, MerchantStoreRow>(sql)
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}
