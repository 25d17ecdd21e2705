//! Order summary computation.
//!
//! A pure function of the cart's line items, recomputed on every read and
//! never persisted. Shipping is a flat rate waived strictly above the
//! free-shipping threshold.

use crate::cart::CartLineItem;

/// Orders strictly above this subtotal ship free (minor currency units).
pub const FREE_SHIPPING_THRESHOLD: i64 = 500_000;

/// Flat shipping rate applied at or below the threshold.
pub const FLAT_SHIPPING_RATE: i64 = 25_000;

/// Subtotal, shipping, and total for the current cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    /// Sum of `price * quantity` over all line items.
    pub subtotal: i64,
    /// Zero above the threshold, the flat rate otherwise.
    pub shipping: i64,
    /// `subtotal + shipping`.
    pub total: i64,
}

impl OrderSummary {
    /// Compute the summary for a set of line items.
    #[must_use]
    pub fn of(items: &[CartLineItem]) -> Self {
        let subtotal: i64 = items.iter().map(CartLineItem::line_total).sum();
        let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
            0
        } else {
            FLAT_SHIPPING_RATE
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// True when the flat rate was waived.
    #[must_use]
    pub const fn free_shipping(&self) -> bool {
        self.shipping == 0
    }
}
