//! The shopping cart aggregate.
//!
//! One cart per shopper session. Line items are keyed by product id in
//! insertion order, and a denormalized running count is kept in sync with
//! the line-item quantities after every mutation. Each mutation writes a
//! full snapshot through the [`CartStorage`] sink; a failed write is logged
//! and swallowed so the in-memory cart stays usable for the session.

use serde::{Deserialize, Serialize};

use crate::storage::CartStorage;

/// A single row in the cart: one product id and its aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier. The aggregation key, unique within the cart.
    pub id: String,
    /// Display name, captured when the item was first added.
    pub name: String,
    /// Unit price in minor currency units, captured when first added.
    pub price: i64,
    /// Aggregated quantity. Always at least 1; a line that would drop to
    /// zero is removed instead.
    pub quantity: u32,
    /// Product image URL, captured when first added.
    pub image_url: String,
}

impl CartLineItem {
    /// Price of the whole line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// The product fields snapshotted into a new line item by
/// [`CartStore::add_item`].
///
/// Snapshot semantics are first-write-wins: adding the same id again only
/// bumps the quantity and never refreshes `name`, `price`, or `image_url`.
/// If the upstream catalog changes a price mid-session the cart keeps the
/// price it saw first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub image_url: String,
}

/// The full cart state: ordered line items plus the running item count.
///
/// Invariant: `count` equals the saturating sum of all line-item quantities
/// after every mutation settles. Quantities near `u32::MAX` pin the count at
/// `u32::MAX` instead of overflowing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
    pub count: u32,
}

impl CartState {
    /// True when the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line-item quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn recounted(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, item| acc.saturating_add(item.quantity))
    }
}

/// The cart store: owns a [`CartState`] and a persistence sink.
///
/// All mutations run synchronously to completion, so each one is atomic
/// with respect to the others within a session. Concurrent sessions writing
/// to the same record are not merged; the last full snapshot wins.
#[derive(Debug)]
pub struct CartStore<S> {
    state: CartState,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from storage, or start empty when the record is
    /// missing or unreadable.
    ///
    /// The running count is recomputed from the loaded items so a stale or
    /// hand-edited record can never violate the count invariant.
    pub fn hydrate(storage: S) -> Self {
        let mut state = storage.load().unwrap_or_default();
        state.count = state.recounted();
        Self { state, storage }
    }

    /// Read-only view of the line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    /// The running total of all line-item quantities.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.state.count
    }

    /// Read-only snapshot of the full cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Add one unit of a product to the cart.
    ///
    /// A new id appends a line with quantity 1; an existing id bumps that
    /// line's quantity and keeps its original snapshot fields. Always
    /// succeeds.
    pub fn add_item(&mut self, candidate: ProductSnapshot) {
        if let Some(existing) = self
            .state
            .items
            .iter_mut()
            .find(|item| item.id == candidate.id)
        {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.state.items.push(CartLineItem {
                id: candidate.id,
                name: candidate.name,
                price: candidate.price,
                quantity: 1,
                image_url: candidate.image_url,
            });
        }
        self.state.count = self.state.recounted();
        self.persist();
    }

    /// Remove a line item entirely, decrementing the count by the line's
    /// whole quantity. Removing an absent id is a no-op, not an error.
    pub fn remove_item(&mut self, id: &str) {
        if self.state.items.iter().any(|item| item.id == id) {
            self.state.items.retain(|item| item.id != id);
            self.state.count = self.state.recounted();
        }
        self.persist();
    }

    /// Set a line item's quantity, clamped to a minimum of 1.
    ///
    /// Dropping a line to zero is an explicit, separate action via
    /// [`Self::remove_item`]. Updates for ids not in the cart are silently
    /// ignored; a debug line is emitted since that usually means the UI is
    /// referencing a line that was already removed.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        if let Some(item) = self.state.items.iter_mut().find(|item| item.id == id) {
            item.quantity = clamped;
            self.state.count = self.state.recounted();
        } else {
            tracing::debug!(id, "quantity update for an id not in the cart; ignored");
        }
        self.persist();
    }

    /// Reset the cart to empty. Always succeeds.
    pub fn clear(&mut self) {
        self.state = CartState::default();
        self.persist();
    }

    /// Write the current state through the storage sink.
    ///
    /// Cart usability must not depend on persistence succeeding, so a
    /// failed save is logged and otherwise swallowed.
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.state) {
            tracing::warn!(error = %e, "failed to persist cart; in-memory state kept");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};
    use crate::summary::OrderSummary;

    fn widget() -> ProductSnapshot {
        ProductSnapshot {
            id: "A".to_string(),
            name: "Widget".to_string(),
            price: 100_000,
            image_url: "/a.png".to_string(),
        }
    }

    fn gadget() -> ProductSnapshot {
        ProductSnapshot {
            id: "B".to_string(),
            name: "Gadget".to_string(),
            price: 450_000,
            image_url: "/b.png".to_string(),
        }
    }

    fn count_invariant_holds<S>(store: &CartStore<S>) -> bool {
        store.state.count == store.state.recounted()
    }

    #[test]
    fn test_starts_empty_without_record() {
        let store = CartStore::hydrate(MemoryStorage::default());
        assert!(store.items().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_add_new_item_appends_with_quantity_one() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 1);
        assert_eq!(store.count(), 1);
        assert!(count_invariant_holds(&store));
    }

    #[test]
    fn test_add_existing_item_bumps_quantity() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.add_item(widget());

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_repeat_add_keeps_first_snapshot() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());

        // Same id, different display data: the original snapshot wins.
        store.add_item(ProductSnapshot {
            id: "A".to_string(),
            name: "Widget (renamed)".to_string(),
            price: 999_999,
            image_url: "/new.png".to_string(),
        });

        let line = &store.items()[0];
        assert_eq!(line.name, "Widget");
        assert_eq!(line.price, 100_000);
        assert_eq!(line.image_url, "/a.png");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_repeated_add_equals_single_add_plus_update() {
        let mut repeated = CartStore::hydrate(MemoryStorage::default());
        for _ in 0..5 {
            repeated.add_item(widget());
        }

        let mut updated = CartStore::hydrate(MemoryStorage::default());
        updated.add_item(widget());
        updated.update_quantity("A", 5);

        assert_eq!(repeated.state(), updated.state());
    }

    #[test]
    fn test_remove_item_drops_whole_line() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(gadget());
        let before = store.count();

        store.add_item(widget());
        store.add_item(widget());
        store.remove_item("A");

        assert!(store.items().iter().all(|item| item.id != "A"));
        assert_eq!(store.count(), before);
        assert!(count_invariant_holds(&store));
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.remove_item("nope");

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());

        store.update_quantity("A", 0);
        assert_eq!(store.items()[0].quantity, 1);

        store.update_quantity("A", -5);
        assert_eq!(store.items()[0].quantity, 1);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_update_quantity_recomputes_count() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.add_item(gadget());

        store.update_quantity("A", 7);
        assert_eq!(store.count(), 8);
        assert!(count_invariant_holds(&store));

        store.update_quantity("A", 2);
        assert_eq!(store.count(), 3);
        assert!(count_invariant_holds(&store));
    }

    #[test]
    fn test_extreme_quantity_saturates_count() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.add_item(gadget());

        store.update_quantity("A", i64::from(u32::MAX));
        assert_eq!(store.items()[0].quantity, u32::MAX);
        assert_eq!(store.count(), u32::MAX);
        assert!(count_invariant_holds(&store));

        // Adding more cannot push the line or the count past the ceiling.
        store.add_item(widget());
        assert_eq!(store.items()[0].quantity, u32::MAX);
        assert_eq!(store.count(), u32::MAX);
        assert!(count_invariant_holds(&store));

        // Removing the saturated line restores the exact remainder.
        store.remove_item("A");
        assert_eq!(store.count(), 1);
        assert!(count_invariant_holds(&store));
    }

    #[test]
    fn test_quantity_above_u32_range_clamps_to_max() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());

        store.update_quantity("A", i64::MAX);
        assert_eq!(store.items()[0].quantity, u32::MAX);
        assert_eq!(store.count(), u32::MAX);
    }

    #[test]
    fn test_update_quantity_absent_id_is_noop() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.update_quantity("nope", 10);

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_clear_resets_fully() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.add_item(widget());
        store.add_item(gadget());
        store.update_quantity("B", 4);

        store.clear();
        assert!(store.items().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_insertion_order_preserved_across_mutations() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.add_item(gadget());
        store.update_quantity("A", 3);
        store.add_item(widget());

        let ids: Vec<&str> = store.items().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn test_hydrate_survives_reload() {
        let storage = MemoryStorage::default();
        {
            let mut store = CartStore::hydrate(storage.clone());
            store.add_item(widget());
            store.add_item(widget());
            store.add_item(gadget());
        }

        let reloaded = CartStore::hydrate(storage);
        assert_eq!(reloaded.items().len(), 2);
        assert_eq!(reloaded.count(), 3);
    }

    #[test]
    fn test_hydrate_recounts_inconsistent_record() {
        let storage = MemoryStorage::default();
        storage
            .save(&CartState {
                items: vec![CartLineItem {
                    id: "A".to_string(),
                    name: "Widget".to_string(),
                    price: 100_000,
                    quantity: 4,
                    image_url: "/a.png".to_string(),
                }],
                // Wrong on purpose; the sum of quantities is 4.
                count: 99,
            })
            .unwrap();

        let store = CartStore::hydrate(storage);
        assert_eq!(store.count(), 4);
    }

    #[test]
    fn test_storage_failure_keeps_in_memory_state() {
        struct BrokenStorage;

        impl CartStorage for BrokenStorage {
            fn load(&self) -> Option<CartState> {
                None
            }

            fn save(&self, _state: &CartState) -> Result<(), StorageError> {
                Err(StorageError::Unavailable("quota exceeded".to_string()))
            }
        }

        let mut store = CartStore::hydrate(BrokenStorage);
        store.add_item(widget());
        store.add_item(gadget());
        store.update_quantity("B", 3);

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.count(), 4);
    }

    #[test]
    fn test_checkout_scenario_over_free_shipping_threshold() {
        let mut store = CartStore::hydrate(MemoryStorage::default());
        store.add_item(widget());
        store.add_item(widget());
        store.add_item(gadget());

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(store.items()[1].quantity, 1);
        assert_eq!(store.count(), 3);

        let summary = OrderSummary::of(store.items());
        assert_eq!(summary.subtotal, 650_000);
        assert_eq!(summary.shipping, 0);
        assert_eq!(summary.total, 650_000);
    }
}
