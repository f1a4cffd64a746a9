//! Durable, synchronous persistence of record lists.
//!
//! One storage slot holds one catalog's full record list as a JSON array.
//! Saves are whole-list overwrites; there is no append or partial write.
//! The medium is abstract: the CLI uses [`FileStore`], tests and embedders
//! use [`MemoryStore`], a browser shell would wrap its own key-value API.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::record::Record;

/// Synchronous keyed storage for record lists.
pub trait StorageBackend {
    /// Load the list stored under `key`. An absent slot is an empty list,
    /// not an error. A slot whose content fails to parse is an error the
    /// caller is expected to degrade from (empty catalog), never a panic.
    fn load(&self, key: &str) -> CoreResult<Vec<Record>>;

    /// Serialize and overwrite the full list under `key`.
    fn save(&mut self, key: &str, records: &[Record]) -> CoreResult<()>;
}

/// File-backed storage: one pretty-printed JSON file per slot inside a
/// directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The file path backing a slot.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStore {
    fn load(&self, key: &str) -> CoreResult<Vec<Record>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|source| CoreError::StoreIo {
            key: key.to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CoreError::CorruptStore {
            key: key.to_string(),
            source,
        })
    }

    fn save(&mut self, key: &str, records: &[Record]) -> CoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| CoreError::StoreIo {
            key: key.to_string(),
            source,
        })?;
        let content = serde_json::to_string_pretty(records)?;
        fs::write(self.slot_path(key), content).map_err(|source| CoreError::StoreIo {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory storage for tests and embedding. Slots hold serialized JSON
/// so loads exercise the same parse path as the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place raw text in a slot, bypassing serialization. Lets tests
    /// stage corrupt or legacy payloads.
    pub fn insert_raw(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.slots.insert(key.into(), content.into());
    }

    /// Returns true if a slot exists.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }
}

impl StorageBackend for MemoryStore {
    fn load(&self, key: &str) -> CoreResult<Vec<Record>> {
        match self.slots.get(key) {
            None => Ok(Vec::new()),
            Some(content) => {
                serde_json::from_str(content).map_err(|source| CoreError::CorruptStore {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    fn save(&mut self, key: &str, records: &[Record]) -> CoreResult<()> {
        let content = serde_json::to_string_pretty(records)?;
        self.slots.insert(key.to_string(), content);
        Ok(())
    }
}
