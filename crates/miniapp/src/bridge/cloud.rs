//! In-memory cloud storage double.
//!
//! Stands in for the host's cloud store in tests and in embeddings that
//! run outside the host. Enforces the host's documented limits so code
//! paths that depend on a rejected write (an oversized cart snapshot,
//! for instance) are exercised the same way they would be in production.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::storage::CloudStorage;

/// Host limit: keys are 1-128 characters of `A-Za-z0-9_-`.
const MAX_KEY_LEN: usize = 128;
/// Host limit: values are capped at 4096 characters.
const MAX_VALUE_LEN: usize = 4096;

fn key_is_valid(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// In-memory [`CloudStorage`] with host-equivalent limits.
///
/// Handles are cheap clones sharing one map, so a test can keep a handle
/// while the store owns another.
#[derive(Clone, Default)]
pub struct MemoryCloud {
    inner: Arc<MemoryCloudInner>,
}

#[derive(Default)]
struct MemoryCloudInner {
    entries: Mutex<HashMap<String, String>>,
    unavailable: bool,
}

impl MemoryCloud {
    /// An available, empty cloud store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cloud store whose availability probe fails, standing in for an
    /// absent host bridge.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            inner: Arc::new(MemoryCloudInner {
                entries: Mutex::new(HashMap::new()),
                unavailable: true,
            }),
        }
    }

    /// Direct read, bypassing the async surface. Test convenience.
    #[must_use]
    pub fn raw_get(&self, key: &str) -> Option<String> {
        self.inner
            .entries
            .lock()
            .expect("cloud lock poisoned")
            .get(key)
            .cloned()
    }

    /// Direct write, bypassing the async surface and its limits. Test
    /// convenience for seeding state.
    pub fn raw_set(&self, key: &str, value: &str) {
        self.inner
            .entries
            .lock()
            .expect("cloud lock poisoned")
            .insert(key.to_owned(), value.to_owned());
    }
}

#[async_trait]
impl CloudStorage for MemoryCloud {
    fn is_available(&self) -> bool {
        !self.inner.unavailable
    }

    async fn get_item(&self, key: &str) -> Option<String> {
        if !key_is_valid(key) {
            return None;
        }
        self.raw_get(key)
    }

    async fn set_item(&self, key: &str, value: &str) -> bool {
        if !key_is_valid(key) || value.len() > MAX_VALUE_LEN {
            return false;
        }
        self.raw_set(key, value);
        true
    }
}
