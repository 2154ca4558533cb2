//! Merchant store and language context for a request.
//!
//! Resolution itself lives behind [`StoreResolver`] so the search pipeline
//! never reaches for a global directory.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CatalogError;
use crate::types::DbId;

/// Language used when a requested code is unknown and the store has no default.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A merchant store, the unit every catalog and index query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantStore {
    pub id: DbId,
    pub code: String,
    pub name: String,
    /// ISO 4217 currency code, e.g. `USD`.
    pub currency_code: String,
    /// Display symbol for the currency, e.g. `$`.
    pub currency_symbol: String,
    /// Show the national symbol (`$12.00`) instead of the ISO code (`USD 12.00`).
    pub currency_format_national: bool,
    /// Language code used when the requested one is unknown.
    pub default_language: String,
}

/// A catalog language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: DbId,
    pub code: String,
}

/// Resolves store and language codes to canonical objects.
#[async_trait]
pub trait StoreResolver: Send + Sync {
    /// Look up a store by code. `Ok(None)` means the code is unknown.
    async fn resolve_store(&self, code: &str) -> Result<Option<MerchantStore>, CatalogError>;

    /// Look up a language by code, falling back to the store's default
    /// language and then to [`DEFAULT_LANGUAGE`].
    async fn resolve_language(
        &self,
        store: &MerchantStore,
        code: &str,
    ) -> Result<Language, CatalogError>;
}
