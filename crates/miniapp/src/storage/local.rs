//! Synchronous local key-value store (Backend A).
//!
//! The web build backs this with the browser's local storage; native
//! embeddings use [`FileStore`], a single JSON file holding the key-value
//! map. Both honor the same contract: synchronous, always openable, and
//! bounded in size.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors a local backend can raise. `DualStore` swallows all of them;
/// they exist so backends can report what went wrong to the debug log.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key-value map could not be serialized.
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The write would push the store past its size bound.
    #[error("store quota exceeded: {attempted} of {limit} bytes")]
    QuotaExceeded {
        /// Serialized size the write would have produced.
        attempted: usize,
        /// Hard cap on the serialized store.
        limit: usize,
    },
}

/// Synchronous key-value backend.
///
/// Implementations must be safe to call from the UI event loop: no
/// network, no awaiting.
pub trait LocalStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the value cannot be stored (quota,
    /// serialization, I/O).
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-backed local store: one JSON object mapping keys to string values.
///
/// The whole map is rewritten on every `set_item` via a temp file and an
/// atomic rename, so a crash mid-write leaves the previous snapshot
/// intact. Opening never fails: a missing backing file starts empty, and
/// a malformed one is discarded with a warning.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Hard cap on the serialized store, mirroring a web local-storage
    /// quota.
    pub const MAX_STORE_BYTES: usize = 5 * 1024 * 1024;

    /// Open the store at `path`, loading whatever is already there.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, payload: &str) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read local store, starting empty");
            return HashMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed local store file, starting empty");
            HashMap::new()
        }
    }
}

impl LocalStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().expect("store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().expect("store lock poisoned");
        let previous = entries.insert(key.to_owned(), value.to_owned());

        // Roll the in-memory map back if the write cannot be committed,
        // so memory and disk stay in step.
        let rollback = |entries: &mut HashMap<String, String>| match previous {
            Some(ref p) => {
                entries.insert(key.to_owned(), p.clone());
            }
            None => {
                entries.remove(key);
            }
        };

        let payload = match serde_json::to_string(&*entries) {
            Ok(payload) => payload,
            Err(e) => {
                rollback(&mut *entries);
                return Err(e.into());
            }
        };
        if payload.len() > Self::MAX_STORE_BYTES {
            let attempted = payload.len();
            rollback(&mut *entries);
            return Err(StoreError::QuotaExceeded {
                attempted,
                limit: Self::MAX_STORE_BYTES,
            });
        }
        if let Err(e) = self.flush(&payload) {
            rollback(&mut *entries);
            return Err(e);
        }
        Ok(())
    }
}

/// In-memory local store for tests and storage-less embeddings.
///
/// Handles are cheap clones sharing one map, so a caller can keep a
/// handle for inspection after moving another into a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with entries.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().expect("store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().expect("store lock poisoned");
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
