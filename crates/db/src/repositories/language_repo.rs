//! Repository for catalog languages.

use sqlx::PgPool;

use crate::models::store::LanguageRow;

/// Provides lookups against the `languages` table.
pub struct LanguageRepo;

impl LanguageRepo {
    /// Find a language by its code.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<LanguageRow>, sqlx::Error> {
        sqlx::query_as::<_, LanguageRow>("SELECT id, code FROM languages WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await
    }
}
