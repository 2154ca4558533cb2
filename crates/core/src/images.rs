//! Image location resolution for product and category views.

use crate::catalog::ProductImage;

/// Rendition size segment used in product image paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Large,
}

impl ImageSize {
    fn as_path_segment(self) -> &'static str {
        match self {
            Self::Small => "SMALL",
            Self::Large => "LARGE",
        }
    }
}

/// Builds public image URLs under a static-content base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePaths {
    base_url: String,
}

impl ImagePaths {
    /// `base_url` may be empty for host-relative paths; a trailing `/` is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// `{base}/static/products/{store}/{sku}/{size}/{file}`
    pub fn product_image(
        &self,
        store_code: &str,
        sku: &str,
        size: ImageSize,
        file_name: &str,
    ) -> String {
        format!(
            "{}/static/products/{store_code}/{sku}/{}/{file_name}",
            self.base_url,
            size.as_path_segment()
        )
    }

    /// `{base}/static/categories/{store}/{file}`
    pub fn category_image(&self, store_code: &str, file_name: &str) -> String {
        format!("{}/static/categories/{store_code}/{file_name}", self.base_url)
    }
}

/// The image flagged as default, else the first one.
pub fn default_image(images: &[ProductImage]) -> Option<&ProductImage> {
    images
        .iter()
        .find(|image| image.default_image)
        .or_else(|| images.first())
}
