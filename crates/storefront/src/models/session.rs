//! Session-related types.

/// Session keys for shopper state.
pub mod keys {
    /// Key for storing the shopper's cart id.
    pub const CART_ID: &str = "cart_id";
}
