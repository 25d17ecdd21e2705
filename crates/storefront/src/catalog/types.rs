//! Catalog API response types.
//!
//! Mirrors the JSON shapes served by the catalog REST API. All prices are
//! integer minor currency units.

use serde::Deserialize;

/// One product row in a listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListItem {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub min_price: i64,
    pub max_price: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Paged product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    pub items: Vec<ProductListItem>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Full product detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetail {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// A product image with its display position.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub position: i32,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    #[serde(default)]
    pub sku: String,
    pub name: String,
    pub price: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

impl ProductDetail {
    /// First image by position, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().min_by_key(|img| img.position)
    }

    /// The variant offered by default: the cheapest active one.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .filter(|v| v.active)
            .min_by_key(|v| v.price)
    }
}
