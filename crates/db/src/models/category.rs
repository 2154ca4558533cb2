//! Category rows.

use sqlx::FromRow;
use storefront_core::catalog::Category;
use storefront_core::types::DbId;

/// A `categories` row joined with its description in one language.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub friendly_url: Option<String>,
    pub image: Option<String>,
    pub depth: i32,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            friendly_url: row.friendly_url,
            image: row.image,
            depth: row.depth,
        }
    }
}
