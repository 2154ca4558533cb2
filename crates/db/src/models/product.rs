//! Product rows.
//!
//! A product is read as one [`ProductRow`] (product, description, default
//! price and manufacturer joined) plus any number of [`ProductImageRow`]s.

use chrono::NaiveDate;
use sqlx::FromRow;
use storefront_core::catalog::{Manufacturer, Product, ProductImage, ProductPrice};
use storefront_core::types::DbId;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: DbId,
    pub sku: String,
    pub available: bool,
    pub date_available: Option<NaiveDate>,
    pub quantity: i32,
    pub name: String,
    pub description: Option<String>,
    pub friendly_url: Option<String>,
    pub manufacturer_id: Option<DbId>,
    pub manufacturer_code: Option<String>,
    pub manufacturer_name: Option<String>,
    pub amount: i64,
    pub special_amount: Option<i64>,
    pub special_start: Option<NaiveDate>,
    pub special_end: Option<NaiveDate>,
}

/// A row from the `product_images` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductImageRow {
    pub product_id: DbId,
    pub file_name: String,
    pub default_image: bool,
}

impl ProductRow {
    /// Assemble the domain product, attaching `images` in the given order.
    pub fn into_product(self, images: Vec<ProductImage>) -> Product {
        let manufacturer = match (
            self.manufacturer_id,
            self.manufacturer_code,
            self.manufacturer_name,
        ) {
            (Some(id), Some(code), Some(name)) => Some(Manufacturer { id, code, name }),
            _ => None,
        };

        Product {
            id: self.id,
            sku: self.sku,
            available: self.available,
            date_available: self.date_available,
            quantity: self.quantity,
            name: self.name,
            description: self.description,
            friendly_url: self.friendly_url,
            manufacturer,
            price: ProductPrice {
                amount: self.amount,
                special_amount: self.special_amount,
                special_start: self.special_start,
                special_end: self.special_end,
            },
            images,
        }
    }
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            file_name: row.file_name,
            default_image: row.default_image,
        }
    }
}
