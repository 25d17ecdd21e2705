//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::ListProductsParams;
use crate::filters;
use crate::routes::catalog::ProductCardView;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_PRODUCTS: u32 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Featured products for the front-page grid.
    pub featured: Vec<ProductCardView>,
}

/// Display the home page.
///
/// A catalog outage degrades to an empty grid rather than an error page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let params = ListProductsParams {
        limit: Some(FEATURED_PRODUCTS),
        ..Default::default()
    };

    let featured = state.catalog().list_products(&params).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |list| list.items.iter().map(ProductCardView::from).collect(),
    );

    HomeTemplate { featured }
}
