//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::catalog::types::{ProductDetail, ProductVariant};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product detail display data for templates.
///
/// Carries both the formatted price for display and the raw minor-unit
/// price that goes into the add-to-cart snapshot.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
    pub price_minor: i64,
    pub variants: Vec<VariantView>,
}

/// Variant display data for templates.
#[derive(Clone)]
pub struct VariantView {
    pub name: String,
    pub sku: String,
    pub price: String,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            name: variant.name.clone(),
            sku: variant.sku.clone(),
            price: filters::format_rupiah(variant.price),
        }
    }
}

impl From<&ProductDetail> for ProductView {
    fn from(detail: &ProductDetail) -> Self {
        let price_minor = detail.default_variant().map_or(0, |v| v.price);

        Self {
            id: detail.id.clone(),
            slug: detail.slug.clone(),
            name: detail.name.clone(),
            description: detail.description.clone(),
            image_url: detail
                .primary_image()
                .map(|img| img.url.clone())
                .unwrap_or_default(),
            price: filters::format_rupiah(price_minor),
            price_minor,
            variants: detail
                .variants
                .iter()
                .filter(|v| v.active)
                .map(VariantView::from)
                .collect(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Display product detail page.
///
/// # Errors
///
/// Returns a 404 page for an unknown slug, or a 502 page when the catalog
/// API is unreachable.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let detail = state.catalog().get_product(&slug).await?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&detail),
    })
}
