//! Catalog listing route handler.
//!
//! Search, category, and sort parameters are passed straight through to
//! the catalog API; the storefront owns none of their semantics.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{ListProductsParams, types::ProductListItem};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Products shown per catalog page.
const PAGE_SIZE: u32 = 24;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub slug: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl From<&ProductListItem> for ProductCardView {
    fn from(item: &ProductListItem) -> Self {
        Self {
            slug: item.slug.clone(),
            name: item.name.clone(),
            price: filters::format_rupiah(item.min_price),
            image_url: item.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub cat: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// Catalog listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub query: String,
    pub category: String,
    pub sort: String,
    pub page: u32,
    pub has_more: bool,
}

/// Display the catalog listing page.
///
/// # Errors
///
/// Returns a 502 page when the catalog API is unreachable.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogIndexTemplate> {
    let page = query.page.unwrap_or(1).max(1);
    let params = ListProductsParams {
        q: query.q.clone(),
        cat: query.cat.clone(),
        sort: query.sort.clone().filter(|s| !s.is_empty()),
        page: Some(page),
        limit: Some(PAGE_SIZE),
    };

    let list = state.catalog().list_products(&params).await?;

    // When the API reports a total we can tell whether another page exists;
    // otherwise assume a full page means there is more.
    let has_more = list.total.map_or_else(
        || list.items.len() == PAGE_SIZE as usize,
        |total| u64::from(page) * u64::from(PAGE_SIZE) < total,
    );

    Ok(CatalogIndexTemplate {
        products: list.items.iter().map(ProductCardView::from).collect(),
        query: query.q.unwrap_or_default(),
        category: query.cat.unwrap_or_default(),
        sort: query.sort.unwrap_or_default(),
        page,
        has_more,
    })
}
