//! Host WebApp bridge surface.
//!
//! The mini-app runs inside a host chat/webview environment that may or
//! may not expose its native API. Everything the app consumes from the
//! host sits behind the [`WebApp`] and [`MainButton`] traits; when the
//! bridge is absent the embedding passes [`NullWebApp`] and every call is
//! a no-op. The availability decision is made once at startup, never
//! per call.

pub mod cloud;

use serde::{Deserialize, Serialize};

use nexus_gear_core::UserId;

pub use cloud::MemoryCloud;

/// Host events the app can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebAppEvent {
    /// The native main button was tapped.
    MainButtonClicked,
    /// The host theme changed.
    ThemeChanged,
}

/// Callback registered for a host event.
pub type EventHandler = Box<dyn Fn() + Send + Sync>;

/// The host's init payload: the raw signed string plus the parsed user.
///
/// The raw form is what the auth bootstrap forwards for server-side
/// validation; the parsed user is display-only and must not be trusted.
#[derive(Debug, Clone)]
pub struct InitData {
    /// Raw init payload exactly as the host handed it over.
    pub raw: String,
    /// User record parsed out of the payload, if present.
    pub user: Option<TwaUser>,
}

/// User record carried in the host's init payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwaUser {
    /// Host-assigned user ID.
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

/// The host's native main button.
pub trait MainButton: Send + Sync {
    fn set_text(&self, text: &str);
    fn show(&self);
    fn hide(&self);
    fn enable(&self);
    fn disable(&self);
    fn show_progress(&self);
    fn hide_progress(&self);
}

/// Host WebApp lifecycle and UI surface.
///
/// One implementation per embedding: the webview shell wires these
/// through to the host API, tests use recording doubles, and an absent
/// host is represented by [`NullWebApp`].
pub trait WebApp: Send + Sync {
    /// Tell the host the app is ready to be shown.
    fn ready(&self);

    /// Expand the webview to full height.
    fn expand(&self);

    fn set_header_color(&self, color: &str);

    fn set_background_color(&self, color: &str);

    /// The signed init payload, when the host provided one.
    fn init_data(&self) -> Option<InitData>;

    /// The host's native main button.
    fn main_button(&self) -> &dyn MainButton;

    /// Subscribe to a host event.
    fn on_event(&self, event: WebAppEvent, handler: EventHandler);

    /// Show a native alert dialog.
    fn show_alert(&self, text: &str);

    /// Hand a payload to the host's chat layer. Returns whether the host
    /// accepted it.
    fn send_data(&self, payload: &str) -> bool;

    /// Close the mini-app.
    fn close(&self);
}

/// Null object for an absent host bridge.
///
/// Every operation is a no-op; `init_data` is `None` and `send_data`
/// reports failure, so callers can keep a single code path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWebApp;

/// Main button of an absent host bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMainButton;

impl MainButton for NullMainButton {
    fn set_text(&self, _text: &str) {}
    fn show(&self) {}
    fn hide(&self) {}
    fn enable(&self) {}
    fn disable(&self) {}
    fn show_progress(&self) {}
    fn hide_progress(&self) {}
}

static NULL_MAIN_BUTTON: NullMainButton = NullMainButton;

impl WebApp for NullWebApp {
    fn ready(&self) {}

    fn expand(&self) {}

    fn set_header_color(&self, _color: &str) {}

    fn set_background_color(&self, _color: &str) {}

    fn init_data(&self) -> Option<InitData> {
        None
    }

    fn main_button(&self) -> &dyn MainButton {
        &NULL_MAIN_BUTTON
    }

    fn on_event(&self, _event: WebAppEvent, _handler: EventHandler) {}

    fn show_alert(&self, text: &str) {
        tracing::debug!(text, "Alert dropped, no host bridge");
    }

    fn send_data(&self, _payload: &str) -> bool {
        false
    }

    fn close(&self) {}
}
