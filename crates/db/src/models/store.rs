//! Store and language rows.

use sqlx::FromRow;
use storefront_core::store::{Language, MerchantStore};
use storefront_core::types::DbId;

/// A `merchant_stores` row joined with its default language code.
#[derive(Debug, Clone, FromRow)]
pub struct MerchantStoreRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub currency_format_national: bool,
    pub default_language: String,
}

impl From<MerchantStoreRow> for MerchantStore {
    fn from(row: MerchantStoreRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            name: row.name,
            currency_code: row.currency_code,
            currency_symbol: row.currency_symbol,
            currency_format_national: row.currency_format_national,
            default_language: row.default_language,
        }
    }
}

/// A row from the `languages` table.
#[derive(Debug, Clone, FromRow)]
pub struct LanguageRow {
    pub id: DbId,
    pub code: String,
}

impl From<LanguageRow> for Language {
    fn from(row: LanguageRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
        }
    }
}
