//! Response shapes handed to the HTTP layer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use storefront_core::catalog::{Category, Manufacturer, Product, ProductImage};
use storefront_core::images::{default_image, ImagePaths, ImageSize};
use storefront_core::pricing::{final_price, format_amount};
use storefront_core::store::{Language, MerchantStore};
use storefront_core::types::DbId;

/// First-class facet types. Serialized lowercase as the facet map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetType {
    Categories,
    Manufacturer,
}

/// Enriched facets keyed by type; each list keeps catalog order.
pub type FacetMap = BTreeMap<FacetType, Vec<EnrichedFacet>>;

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub products: Vec<ReadableProduct>,
    /// Number of entries in `products`, never the raw hit count.
    pub product_count: usize,
    pub facets: FacetMap,
}

/// Autocomplete result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSuggestions {
    pub keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A catalog product localized and priced for one store and language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadableProduct {
    pub id: DbId,
    pub sku: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<ReadableManufacturer>,
    /// Formatted price in effect today.
    pub price: String,
    /// Formatted base price; differs from `price` only when `discounted`.
    pub original_price: String,
    pub discounted: bool,
    pub available: bool,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ReadableImage>,
    pub images: Vec<ReadableImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadableManufacturer {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadableImage {
    pub file_name: String,
    pub small_url: String,
    pub large_url: String,
    pub default_image: bool,
}

impl From<&Manufacturer> for ReadableManufacturer {
    fn from(m: &Manufacturer) -> Self {
        Self {
            id: m.id,
            code: m.code.clone(),
            name: m.name.clone(),
        }
    }
}

impl ReadableProduct {
    /// Build the view for `product`, pricing it as of `today`.
    pub fn populate(
        product: &Product,
        store: &MerchantStore,
        language: &Language,
        images: &ImagePaths,
        today: NaiveDate,
    ) -> Self {
        let price = final_price(&product.price, today);
        let readable_image =
            |image: &ProductImage| ReadableImage::resolve(image, &store.code, &product.sku, images);

        Self {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            friendly_url: product.friendly_url.clone(),
            manufacturer: product.manufacturer.as_ref().map(ReadableManufacturer::from),
            price: format_amount(price.final_amount, store, language),
            original_price: format_amount(price.original, store, language),
            discounted: price.discounted,
            available: product.available,
            quantity: product.quantity,
            image: default_image(&product.images).map(readable_image),
            images: product.images.iter().map(readable_image).collect(),
        }
    }
}

impl ReadableImage {
    fn resolve(image: &ProductImage, store_code: &str, sku: &str, paths: &ImagePaths) -> Self {
        Self {
            file_name: image.file_name.clone(),
            small_url: paths.product_image(store_code, sku, ImageSize::Small, &image.file_name),
            large_url: paths.product_image(store_code, sku, ImageSize::Large, &image.file_name),
            default_image: image.default_image,
        }
    }
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// A catalog-sourced facet entry annotated with its bucket count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedFacet {
    pub id: DbId,
    pub code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub depth: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<i64>,
}

impl EnrichedFacet {
    pub fn from_category(
        category: &Category,
        store: &MerchantStore,
        images: &ImagePaths,
        product_count: Option<i64>,
    ) -> Self {
        Self {
            id: category.id,
            code: category.code.clone(),
            name: category.name.clone(),
            friendly_url: category.friendly_url.clone(),
            image_url: category
                .image
                .as_deref()
                .map(|file| images.category_image(&store.code, file)),
            depth: category.depth,
            product_count,
        }
    }
}
