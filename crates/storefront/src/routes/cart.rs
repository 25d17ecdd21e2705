//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Cart ids are stored in the session and map to persisted cart records;
//! each request hydrates a [`CartStore`] from its record, applies the
//! mutation, and the store persists the new snapshot itself.
//!
//! None of these handlers ever returns an error to the shopper: storage
//! trouble degrades to an empty cart render plus a log line.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use emporia_core::{CartLineItem, CartStore, OrderSummary, ProductSnapshot};

use crate::filters;
use crate::models::session_keys;
use crate::state::AppState;
use crate::storage::FileStorage;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    pub image_url: String,
}

/// Order summary display data for templates.
#[derive(Clone)]
pub struct SummaryView {
    pub subtotal: String,
    pub shipping: String,
    pub free_shipping: bool,
    pub total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: u32,
    pub summary: SummaryView,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_items(&[], 0)
    }

    fn from_items(items: &[CartLineItem], count: u32) -> Self {
        let summary = OrderSummary::of(items);
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            count,
            summary: SummaryView {
                subtotal: filters::format_rupiah(summary.subtotal),
                shipping: filters::format_rupiah(summary.shipping),
                free_shipping: summary.free_shipping(),
                total: filters::format_rupiah(summary.total),
            },
        }
    }
}

impl From<&CartStore<FileStorage>> for CartView {
    fn from(store: &CartStore<FileStorage>) -> Self {
        Self::from_items(store.items(), store.count())
    }
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: filters::format_rupiah(item.price),
            line_total: filters::format_rupiah(item.line_total()),
            image_url: item.image_url.clone(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart id from the session.
pub async fn get_cart_id(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Get the cart id from the session, minting one if absent.
///
/// If the session itself cannot be written the minted id is still used for
/// this request so the mutation takes effect; the cart just won't survive
/// into the next request.
async fn ensure_cart_id(session: &Session) -> String {
    if let Some(id) = get_cart_id(session).await {
        return id;
    }

    let id = Uuid::new_v4().to_string();
    if let Err(e) = session.insert(session_keys::CART_ID, &id).await {
        tracing::error!("Failed to save cart id to session: {e}");
    }
    id
}

/// Hydrate the session's cart, or an empty ephemeral one when no cart id
/// exists yet.
async fn hydrate_cart(state: &AppState, session: &Session) -> CartStore<FileStorage> {
    let id = ensure_cart_id(session).await;
    CartStore::hydrate(state.carts().record(&id))
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data: the product snapshot captured at add time.
///
/// The snapshot is trusted as-is; there is no re-fetch against the live
/// catalog and no price verification.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub image_url: String,
}

impl From<AddToCartForm> for ProductSnapshot {
    fn from(form: AddToCartForm) -> Self {
        Self {
            id: form.product_id,
            name: form.name,
            price: form.price,
            image_url: form.image_url,
        }
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = match get_cart_id(&session).await {
        Some(id) => CartView::from(&CartStore::hydrate(state.carts().record(&id))),
        None => CartView::empty(),
    };

    CartShowTemplate { cart }
}

/// Add item to cart (HTMX).
///
/// Always succeeds; aggregates by product id with quantity 1 per call.
/// Returns the count badge plus an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let mut cart = hydrate_cart(&state, &session).await;
    cart.add_item(ProductSnapshot::from(form));

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.count(),
        },
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
///
/// Quantities below 1 are clamped to 1; updates for ids not in the cart
/// are ignored.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let mut cart = hydrate_cart(&state, &session).await;
    cart.update_quantity(&form.product_id, form.quantity);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let mut cart = hydrate_cart(&state, &session).await;
    cart.remove_item(&form.product_id);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Clear the whole cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let mut cart = hydrate_cart(&state, &session).await;
    cart.clear();

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::empty(),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = match get_cart_id(&session).await {
        Some(id) => CartStore::hydrate(state.carts().record(&id)).count(),
        None => 0,
    };

    CartCountTemplate { count }
}
