//! Cart persistence capability.
//!
//! The store writes one named record holding a full serialized snapshot of
//! the cart, and reads it back once at hydration. Adapters live where their
//! I/O lives; this module only defines the seam and an in-memory
//! implementation for tests.

use thiserror::Error;

use crate::cart::CartState;

/// Errors a storage sink can report on save.
///
/// Load has no error channel on purpose: a missing or malformed record
/// must yield the empty default cart, never a failure surfaced to the UI.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The snapshot could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The sink itself rejected the write (full, unwritable, poisoned).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable slot holding one serialized cart snapshot.
pub trait CartStorage {
    /// Read the persisted snapshot, or `None` when the record is missing
    /// or cannot be decoded.
    fn load(&self) -> Option<CartState>;

    /// Replace the persisted snapshot with `state`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the snapshot cannot be serialized or
    /// the sink cannot be written. Callers treat this as best-effort.
    fn save(&self, state: &CartState) -> Result<(), StorageError>;
}

/// In-memory storage slot.
///
/// Round-trips through the same JSON encoding the file adapter uses, so
/// tests built on it also exercise serialization. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Option<CartState> {
        let slot = self.slot.lock().ok()?;
        let raw = slot.as_ref()?;
        serde_json::from_str(raw).ok()
    }

    fn save(&self, state: &CartState) -> Result<(), StorageError> {
        let raw = serde_json::to_string(state)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Unavailable("slot lock poisoned".to_string()))?;
        *slot = Some(raw);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartLineItem;

    fn sample_state() -> CartState {
        CartState {
            items: vec![
                CartLineItem {
                    id: "A".to_string(),
                    name: "Widget".to_string(),
                    price: 100_000,
                    quantity: 2,
                    image_url: "/a.png".to_string(),
                },
                CartLineItem {
                    id: "B".to_string(),
                    name: "Gadget".to_string(),
                    price: 450_000,
                    quantity: 1,
                    image_url: "/b.png".to_string(),
                },
            ],
            count: 3,
        }
    }

    #[test]
    fn test_load_missing_record_is_none() {
        let storage = MemoryStorage::default();
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_round_trip_preserves_items_and_count() {
        let storage = MemoryStorage::default();
        let state = sample_state();

        storage.save(&state).unwrap();
        let loaded = storage.load().unwrap();

        assert_eq!(loaded, state);
        // Order-preserving: same ids in the same positions.
        assert_eq!(loaded.items[0].id, "A");
        assert_eq!(loaded.items[1].id, "B");
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let storage = MemoryStorage::default();
        storage.save(&sample_state()).unwrap();
        storage.save(&CartState::default()).unwrap();

        let loaded = storage.load().unwrap();
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.count, 0);
    }

    #[test]
    fn test_malformed_record_loads_as_none() {
        let storage = MemoryStorage::default();
        *storage.slot.lock().unwrap() = Some("{not json".to_string());
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let storage = MemoryStorage::default();
        let other = storage.clone();

        storage.save(&sample_state()).unwrap();
        assert_eq!(other.load().unwrap().count, 3);
    }
}
