//! Best-effort persistence over two independently-failing backends.
//!
//! Backend A is a synchronous local store that is always present
//! ([`LocalStore`]). Backend B is the host's asynchronous cloud store
//! ([`CloudStorage`]), which may be absent entirely. [`DualStore`] gives
//! the cart engine one surface over both: reads and writes never error,
//! they degrade to `None`/`false`, and a failed write is retried simply
//! by the next write.

pub mod local;

use std::sync::Arc;

use async_trait::async_trait;

pub use local::{FileStore, LocalStore, MemoryStore, StoreError};

/// Asynchronous host-provided key-value store (Backend B).
///
/// Modeled on the host bridge's cloud storage: callback errors collapse
/// to `None`/`false`, never into an error type. Availability is probed
/// once by [`DualStore`], not per call.
#[async_trait]
pub trait CloudStorage: Send + Sync {
    /// Whether the host exposes cloud storage at all.
    fn is_available(&self) -> bool;

    /// Read a value. `None` covers both "absent" and "read failed".
    async fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value. `false` covers both "rejected" and "write failed".
    async fn set_item(&self, key: &str, value: &str) -> bool;
}

/// Uniform persistence surface over the local and cloud backends.
///
/// The cloud backend's availability is captured at construction; an
/// unavailable backend turns every cloud operation into an immediate
/// `None`/`false` without touching the host.
pub struct DualStore {
    local: Box<dyn LocalStore>,
    cloud: Arc<dyn CloudStorage>,
    cloud_available: bool,
}

impl DualStore {
    /// Build a store over the two backends, probing cloud availability
    /// once.
    pub fn new<L, C>(local: L, cloud: C) -> Self
    where
        L: LocalStore + 'static,
        C: CloudStorage + 'static,
    {
        let cloud: Arc<dyn CloudStorage> = Arc::new(cloud);
        let cloud_available = cloud.is_available();
        if !cloud_available {
            tracing::debug!("Cloud storage unavailable, persisting locally only");
        }
        Self {
            local: Box::new(local),
            cloud,
            cloud_available,
        }
    }

    /// Synchronous read from the local backend. Failures are swallowed.
    #[must_use]
    pub fn local_get(&self, key: &str) -> Option<String> {
        match self.local.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "Local store read failed");
                None
            }
        }
    }

    /// Synchronous write to the local backend. Failures are swallowed;
    /// returns whether the value was stored.
    pub fn local_set(&self, key: &str, value: &str) -> bool {
        match self.local.set_item(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(key, error = %e, "Local store write failed");
                false
            }
        }
    }

    /// Asynchronous read from the cloud backend. Resolves to `None` when
    /// the backend is unavailable or the read fails.
    pub async fn cloud_get(&self, key: &str) -> Option<String> {
        if !self.cloud_available {
            return None;
        }
        self.cloud.get_item(key).await
    }

    /// Asynchronous write to the cloud backend. Resolves to `false` when
    /// the backend is unavailable or the write fails.
    pub async fn cloud_set(&self, key: &str, value: &str) -> bool {
        if !self.cloud_available {
            return false;
        }
        self.cloud.set_item(key, value).await
    }

    /// Handle to the cloud backend for fire-and-forget writes, `Some`
    /// only when the availability probe succeeded.
    #[must_use]
    pub fn cloud_handle(&self) -> Option<Arc<dyn CloudStorage>> {
        self.cloud_available.then(|| Arc::clone(&self.cloud))
    }
}
