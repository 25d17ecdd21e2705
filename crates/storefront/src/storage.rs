//! File-backed cart persistence.
//!
//! Each cart gets one named JSON record under the data directory, written
//! as a whole-snapshot replace (temp file then rename). Reads happen once
//! per hydration; a missing or corrupt record degrades to an empty cart.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use emporia_core::{CartState, CartStorage, StorageError};

/// Factory for per-cart storage records under one data directory.
#[derive(Debug, Clone)]
pub struct CartRecords {
    data_dir: PathBuf,
}

impl CartRecords {
    /// Open (creating if needed) the cart data directory.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be
    /// created.
    pub fn open(data_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// The storage slot for one cart id.
    ///
    /// Ids are generated as UUIDs by the session layer; anything else is
    /// stripped down to filename-safe characters before touching the
    /// filesystem.
    #[must_use]
    pub fn record(&self, cart_id: &str) -> FileStorage {
        let safe: String = cart_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        FileStorage {
            path: self.data_dir.join(format!("cart-{safe}.json")),
        }
    }

    /// Whether the data directory is currently writable.
    ///
    /// Used by the readiness probe: writes and removes a probe file.
    #[must_use]
    pub fn ready(&self) -> bool {
        let probe = self.data_dir.join(".probe");
        match fs::write(&probe, b"ok") {
            Ok(()) => {
                let _ = fs::remove_file(&probe);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart data directory not writable");
                false
            }
        }
    }
}

/// One durable cart record: a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Option<CartState> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cart record unreadable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cart record malformed; starting empty");
                None
            }
        }
    }

    fn save(&self, state: &CartState) -> Result<(), StorageError> {
        let raw = serde_json::to_vec(state)?;

        // Replace atomically so a crash mid-write cannot corrupt the record.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use emporia_core::CartLineItem;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("emporia-carts-{}", uuid::Uuid::new_v4()));
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn sample_state() -> CartState {
        CartState {
            items: vec![CartLineItem {
                id: "A".to_string(),
                name: "Widget".to_string(),
                price: 100_000,
                quantity: 2,
                image_url: "/a.png".to_string(),
            }],
            count: 2,
        }
    }

    #[test]
    fn test_open_creates_data_dir() {
        let dir = TempDir::new();
        assert!(!dir.0.exists());
        let records = CartRecords::open(&dir.0).unwrap();
        assert!(dir.0.exists());
        assert!(records.ready());
    }

    #[test]
    fn test_missing_record_loads_as_none() {
        let dir = TempDir::new();
        let records = CartRecords::open(&dir.0).unwrap();
        assert!(records.record("missing").load().is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new();
        let records = CartRecords::open(&dir.0).unwrap();
        let storage = records.record("abc-123");

        let state = sample_state();
        storage.save(&state).unwrap();
        assert_eq!(storage.load().unwrap(), state);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = TempDir::new();
        let records = CartRecords::open(&dir.0).unwrap();
        let storage = records.record("abc");

        storage.save(&sample_state()).unwrap();
        storage.save(&CartState::default()).unwrap();
        assert_eq!(storage.load().unwrap(), CartState::default());
    }

    #[test]
    fn test_malformed_record_loads_as_none() {
        let dir = TempDir::new();
        let records = CartRecords::open(&dir.0).unwrap();
        let storage = records.record("bad");

        storage.save(&sample_state()).unwrap();
        fs::write(dir.0.join("cart-bad.json"), b"{not json").unwrap();
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_record_ids_are_sanitized() {
        let dir = TempDir::new();
        let records = CartRecords::open(&dir.0).unwrap();

        let storage = records.record("../../etc/passwd");
        storage.save(&sample_state()).unwrap();

        // The record landed inside the data dir, not outside it.
        assert!(dir.0.join("cart-etcpasswd.json").exists());
    }

    #[test]
    fn test_distinct_ids_get_distinct_records() {
        let dir = TempDir::new();
        let records = CartRecords::open(&dir.0).unwrap();

        records.record("one").save(&sample_state()).unwrap();
        assert!(records.record("two").load().is_none());
    }
}
