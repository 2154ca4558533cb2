//! Catalog entries and the catalog query interface.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CatalogError;
use crate::store::{Language, MerchantStore};
use crate::types::{DbId, MinorUnits};

/// A product as stored in the catalog, localized for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: DbId,
    pub sku: String,
    pub available: bool,
    pub date_available: Option<NaiveDate>,
    pub quantity: i32,
    pub name: String,
    pub description: Option<String>,
    pub friendly_url: Option<String>,
    pub manufacturer: Option<Manufacturer>,
    pub price: ProductPrice,
    pub images: Vec<ProductImage>,
}

/// Base price with an optional time-boxed special.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPrice {
    pub amount: MinorUnits,
    pub special_amount: Option<MinorUnits>,
    pub special_start: Option<NaiveDate>,
    pub special_end: Option<NaiveDate>,
}

impl ProductPrice {
    /// A plain price with no special.
    pub fn regular(amount: MinorUnits) -> Self {
        Self {
            amount,
            special_amount: None,
            special_start: None,
            special_end: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub file_name: String,
    pub default_image: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manufacturer {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

/// A category, localized for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub friendly_url: Option<String>,
    pub image: Option<String>,
    pub depth: i32,
}

/// Filter for a batch product lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCriteria {
    /// Only these products are returned.
    pub product_ids: Vec<DbId>,
    /// Matching entries to skip before `max_count` applies.
    pub start_index: i64,
    /// Upper bound on returned entries.
    pub max_count: i64,
    /// Restrict to products flagged available with no future availability date.
    pub available_only: bool,
}

/// Catalog query interface consumed by hydration and facet enrichment.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the products named in `criteria`, in catalog order.
    async fn list_by_identifiers(
        &self,
        store: &MerchantStore,
        language: &Language,
        criteria: &ProductCriteria,
    ) -> Result<Vec<Product>, CatalogError>;

    /// Fetch the categories whose code is in `codes`.
    async fn list_categories_by_codes(
        &self,
        store: &MerchantStore,
        codes: &[String],
        language: &Language,
    ) -> Result<Vec<Category>, CatalogError>;
}
