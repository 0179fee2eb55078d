//! Whole-document key-value persistence.
//!
//! The grid and both configuration documents are stored as JSON strings
//! under fixed keys. Reads and writes are best effort: the helpers in this
//! module log failures and fall back to defaults instead of returning
//! errors, so a broken store never stops scheduling.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure inside a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A whole-document key-value store.
///
/// No partial updates: every write replaces the full value of a key.
pub trait KeyValueStore: Send {
    /// Reads the raw document under `key`. `Ok(None)` when absent.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the document under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw document.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir`, creating it on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        // Readers only ever see a complete document.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

/// Reads and decodes `key` if it holds a valid document.
///
/// Missing keys are logged at debug level, read or decode failures at
/// warn level; both yield `None`.
pub fn load_existing<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no persisted document");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted document");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "persisted document is unreadable, ignoring it");
            None
        }
    }
}

/// Reads `key`, or falls back to `default()` when missing or unreadable.
pub fn load_or_default<T, F>(store: &dyn KeyValueStore, key: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    load_existing(store, key).unwrap_or_else(default)
}

/// Encodes and writes `value` under `key`.
///
/// # Returns
/// `true` if the write succeeded. Failures are logged, never retried.
pub fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|raw| store.write(key, &raw));
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "failed to persist document");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Day, DemandTable, ServiceType, TimeSlot, WeeklyGrid};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A store whose every call fails.
    #[derive(Debug, Default)]
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    fn scratch_dir() -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        std::env::temp_dir().join(format!(
            "therapy-grid-store-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ))
    }

    #[test]
    fn test_memory_round_trip() {
        let mut store = MemoryStore::new();
        let demand = DemandTable::new().with_requirement("henrique", ServiceType::Psychology, 2);
        assert!(save(&mut store, "demand-config", &demand));

        let back: DemandTable = load_or_default(&store, "demand-config", DemandTable::new);
        assert_eq!(back, demand);
    }

    #[test]
    fn test_missing_key_falls_back() {
        let store = MemoryStore::new();
        let got: DemandTable = load_or_default(&store, "demand-config", crate::defaults::demand);
        assert_eq!(got, crate::defaults::demand());
        assert!(load_existing::<DemandTable>(&store, "demand-config").is_none());
    }

    #[test]
    fn test_garbage_falls_back() {
        let store = MemoryStore::new().with_entry("weekly-grid", "{not json");
        assert!(load_existing::<WeeklyGrid>(&store, "weekly-grid").is_none());
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let mut store = BrokenStore;
        assert!(!save(&mut store, "weekly-grid", &WeeklyGrid::new(["henrique"])));
        let got: DemandTable = load_or_default(&store, "demand-config", DemandTable::new);
        assert_eq!(got, DemandTable::new());
    }

    #[test]
    fn test_file_store() {
        let dir = scratch_dir();
        let mut store = FileStore::new(&dir);
        assert_eq!(store.read("weekly-grid").unwrap(), None);

        let mut grid = WeeklyGrid::new(["henrique"]);
        grid.add(
            Day::Monday,
            TimeSlot::H08,
            &"henrique".into(),
            crate::models::Assignment::new(ServiceType::Psychology, "Ana Luiza", "#EF4444"),
        )
        .unwrap();
        assert!(save(&mut store, "weekly-grid", &grid));
        assert!(dir.join("weekly-grid.json").exists());

        let back: Option<WeeklyGrid> = load_existing(&store, "weekly-grid");
        assert_eq!(back, Some(grid));

        fs::remove_dir_all(&dir).unwrap();
    }
}
