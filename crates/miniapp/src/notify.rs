//! Toast notification queue.
//!
//! The toast id sequence is owned by the [`Notifier`] instance and
//! seeded at construction, so ids are monotonically increasing within a
//! session and two notifiers never share a sequence.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default lifetime for error toasts raised from API responses.
const API_ERROR_TIMEOUT: Duration = Duration::from_millis(3500);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// One visible toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Session-unique, monotonically increasing id.
    pub id: u32,
    pub message: String,
    pub level: ToastLevel,
}

struct NotifierInner {
    toasts: Vec<Toast>,
    next_id: u32,
}

/// Toast queue with explicit id allocation.
///
/// Handles are cheap clones sharing one queue. Timed dismissal spawns
/// onto the current async runtime; without one the toast simply stays
/// until dismissed explicitly.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Mutex<NotifierInner>>,
}

impl Notifier {
    /// Create an empty queue with the id sequence seeded at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierInner {
                toasts: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Push a toast that stays until dismissed. Returns its id.
    pub fn push(&self, message: impl Into<String>, level: ToastLevel) -> u32 {
        let mut inner = self.inner.lock().expect("notifier lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.toasts.push(Toast {
            id,
            message: message.into(),
            level,
        });
        id
    }

    /// Push a toast that dismisses itself after `timeout`.
    pub fn push_timed(&self, message: impl Into<String>, level: ToastLevel, timeout: Duration) -> u32 {
        let id = self.push(message, level);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let inner = Arc::clone(&self.inner);
            handle.spawn(async move {
                tokio::time::sleep(timeout).await;
                inner
                    .lock()
                    .expect("notifier lock poisoned")
                    .toasts
                    .retain(|t| t.id != id);
            });
        }
        id
    }

    /// Remove a toast by id. No-op when already gone.
    pub fn dismiss(&self, id: u32) {
        self.inner
            .lock()
            .expect("notifier lock poisoned")
            .toasts
            .retain(|t| t.id != id);
    }

    /// Raise an error toast from an API failure body of the shape
    /// `{ "error": { "code", "message" } }`, falling back to a generic
    /// message when the body does not parse.
    pub fn push_api_error(&self, body: &str) -> u32 {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| "Error".to_string());
        self.push_timed(message, ToastLevel::Error, API_ERROR_TIMEOUT)
    }

    /// Snapshot of the currently visible toasts.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner
            .lock()
            .expect("notifier lock poisoned")
            .toasts
            .clone()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_from_one() {
        let notifier = Notifier::new();
        let a = notifier.push("a", ToastLevel::Info);
        let b = notifier.push("b", ToastLevel::Success);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(notifier.toasts().len(), 2);
    }

    #[test]
    fn test_dismiss_removes_by_id() {
        let notifier = Notifier::new();
        let a = notifier.push("a", ToastLevel::Info);
        let b = notifier.push("b", ToastLevel::Info);
        notifier.dismiss(a);
        let remaining = notifier.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b);
        // Dismissing again is a no-op.
        notifier.dismiss(a);
        assert_eq!(notifier.toasts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_toast_dismisses_itself() {
        let notifier = Notifier::new();
        notifier.push_timed("gone soon", ToastLevel::Info, Duration::from_millis(10));
        assert_eq!(notifier.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;
        tokio::task::yield_now().await;
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn test_api_error_extracts_message() {
        let notifier = Notifier::new();
        notifier.push_api_error(r#"{"error":{"code":"oos","message":"Out of stock"}}"#);
        assert_eq!(notifier.toasts()[0].message, "Out of stock");
        assert_eq!(notifier.toasts()[0].level, ToastLevel::Error);
    }

    #[test]
    fn test_api_error_falls_back_on_garbage() {
        let notifier = Notifier::new();
        notifier.push_api_error("not json");
        assert_eq!(notifier.toasts()[0].message, "Error");
    }
}
