//! Checkout route handlers.
//!
//! A three-step checkout UI (shipping, payment, review). No orders are
//! recorded and no payment is taken: placing the order is a UI terminal
//! state that clears the cart and shows a confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use emporia_core::CartStore;

use crate::filters;
use crate::routes::cart::{CartView, get_cart_id};
use crate::state::AppState;

/// Checkout page query parameters.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub step: Option<String>,
}

fn step_index(step: Option<&str>) -> usize {
    match step {
        Some("payment") => 1,
        Some("review") => 2,
        _ => 0,
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub step: usize,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub count: u32,
}

/// Display the checkout page for the requested step.
///
/// An empty cart cannot be checked out; the shopper is sent back to the
/// cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CheckoutQuery>,
) -> Response {
    let Some(id) = get_cart_id(&session).await else {
        return Redirect::to("/cart").into_response();
    };

    let cart = CartStore::hydrate(state.carts().record(&id));
    if cart.items().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    CheckoutTemplate {
        cart: CartView::from(&cart),
        step: step_index(query.step.as_deref()),
    }
    .into_response()
}

/// Place the order: clear the cart and show the confirmation page.
#[instrument(skip(state, session))]
pub async fn place(State(state): State<AppState>, session: Session) -> Response {
    let Some(id) = get_cart_id(&session).await else {
        return Redirect::to("/cart").into_response();
    };

    let mut cart = CartStore::hydrate(state.carts().record(&id));
    if cart.items().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let count = cart.count();
    cart.clear();

    ConfirmationTemplate { count }.into_response()
}
