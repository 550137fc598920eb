//! Application state shared across the mini-app session.

use nexus_gear_core::OrderId;

use crate::bridge::WebApp;
use crate::cart::CartEngine;
use crate::config::MiniAppConfig;
use crate::error::{AppError, Result};
use crate::notify::Notifier;
use crate::services::auth::{AuthClient, AuthSession};
use crate::services::checkout::{CheckoutClient, OrderDraft};
use crate::storage::{CloudStorage, DualStore, LocalStore};

/// Everything a session owns: the host bridge, the cart engine, the
/// service clients, and the toast queue.
///
/// Owned by the embedding for the lifetime of the app session. The cart
/// is reachable only through [`AppState::cart`]/[`AppState::cart_mut`],
/// so no other component can hold a mutable handle to it.
pub struct AppState<W: WebApp> {
    config: MiniAppConfig,
    bridge: W,
    cart: CartEngine,
    checkout: CheckoutClient,
    auth: AuthClient,
    notifier: Notifier,
}

impl<W: WebApp> AppState<W> {
    /// Bring the session up: run the host lifecycle calls, hydrate the
    /// cart (local copy first, cloud fallback), and build the service
    /// clients.
    ///
    /// # Errors
    ///
    /// Returns an error when a service client cannot be built from the
    /// configuration.
    pub async fn bootstrap<L, C>(
        config: MiniAppConfig,
        bridge: W,
        local: L,
        cloud: C,
    ) -> Result<Self>
    where
        L: LocalStore + 'static,
        C: CloudStorage + 'static,
    {
        bridge.expand();
        bridge.set_background_color("#ffffff");
        bridge.set_header_color("#ffffff");
        bridge.ready();

        let mut cart = CartEngine::new(DualStore::new(local, cloud));
        cart.hydrate_remote().await;

        let checkout = CheckoutClient::new(&config)?;
        let auth = AuthClient::new(&config)?;

        Ok(Self {
            config,
            bridge,
            cart,
            checkout,
            auth,
            notifier: Notifier::new(),
        })
    }

    /// Submit a validated order through the host UI flow and empty the
    /// cart on success.
    ///
    /// # Errors
    ///
    /// Propagates the checkout failure after the submit control has been
    /// re-enabled; the cart is left untouched so the user can retry.
    pub async fn submit_order(&mut self, draft: &OrderDraft) -> Result<OrderId> {
        let order_id = self.checkout.submit(&self.bridge, draft).await?;
        self.cart.clear();
        Ok(order_id)
    }

    /// Validate the host's init payload against the storefront API.
    ///
    /// # Errors
    ///
    /// `AuthError` variants wrapped in [`AppError`], including
    /// `MissingInitData` when the host exposes no payload.
    pub async fn authenticate(&self) -> Result<AuthSession> {
        self.auth
            .bootstrap_from_bridge(&self.bridge)
            .await
            .map_err(AppError::from)
    }

    #[must_use]
    pub fn config(&self) -> &MiniAppConfig {
        &self.config
    }

    #[must_use]
    pub fn bridge(&self) -> &W {
        &self.bridge
    }

    #[must_use]
    pub fn cart(&self) -> &CartEngine {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartEngine {
        &mut self.cart
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.checkout
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;

    use nexus_gear_core::{Product, ProductId};

    use crate::bridge::{
        EventHandler, InitData, MainButton, MemoryCloud, NullMainButton, NullWebApp, WebAppEvent,
    };
    use crate::cart::CART_STORAGE_KEY;
    use crate::storage::{LocalStore as _, MemoryStore};

    use super::*;

    fn config() -> MiniAppConfig {
        MiniAppConfig {
            api_base_url: "http://localhost:8080/".parse().unwrap(),
            local_store_path: "unused.json".into(),
            http_timeout: std::time::Duration::from_secs(1),
        }
    }

    /// Bridge double recording lifecycle calls in order.
    #[derive(Default)]
    struct LifecycleBridge {
        calls: Mutex<Vec<&'static str>>,
    }

    impl LifecycleBridge {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl WebApp for LifecycleBridge {
        fn ready(&self) {
            self.record("ready");
        }
        fn expand(&self) {
            self.record("expand");
        }
        fn set_header_color(&self, _color: &str) {
            self.record("set_header_color");
        }
        fn set_background_color(&self, _color: &str) {
            self.record("set_background_color");
        }
        fn init_data(&self) -> Option<InitData> {
            None
        }
        fn main_button(&self) -> &dyn MainButton {
            &NullMainButton
        }
        fn on_event(&self, _event: WebAppEvent, _handler: EventHandler) {}
        fn show_alert(&self, _text: &str) {}
        fn send_data(&self, _payload: &str) -> bool {
            false
        }
        fn close(&self) {}
    }

    #[tokio::test]
    async fn test_bootstrap_runs_lifecycle_and_hydrates() {
        let local = MemoryStore::new();
        local
            .set_item(CART_STORAGE_KEY, r#"[{"id":1,"price":"100","quantity":2}]"#)
            .unwrap();

        let state = AppState::bootstrap(config(), LifecycleBridge::default(), local, MemoryCloud::new())
            .await
            .unwrap();

        assert_eq!(state.cart().total_items(), 2);
        let calls = state.bridge().calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec!["expand", "set_background_color", "set_header_color", "ready"]
        );
    }

    #[tokio::test]
    async fn test_bootstrap_with_absent_host() {
        let mut state = AppState::bootstrap(
            config(),
            NullWebApp,
            MemoryStore::new(),
            MemoryCloud::absent(),
        )
        .await
        .unwrap();

        assert!(state.cart().is_empty());
        state
            .cart_mut()
            .add_product(&Product::new(ProductId::new(1), None, Decimal::from(10)));
        assert_eq!(state.cart().total_items(), 1);
    }
}
