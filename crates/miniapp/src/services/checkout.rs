//! Checkout submission.
//!
//! Validates the order form fields, canonicalizes the phone number, and
//! submits the order either over HTTP or through the host's `send_data`
//! channel. This is the one place where failures become user-visible:
//! the server-provided message (or a generic fallback) is surfaced as an
//! alert and the submit control is re-enabled for retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use nexus_gear_core::OrderId;
use nexus_gear_core::phone::CanonicalPhone;

use crate::bridge::{TwaUser, WebApp};
use crate::config::MiniAppConfig;

/// Errors that can occur while preparing or submitting an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// HTTP request failed (connectivity, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built from the configured base.
    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The server rejected the order.
    #[error("{message}")]
    Rejected {
        /// HTTP status the server answered with.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// A required form field is blank.
    #[error("Please fill in the {0} field")]
    EmptyField(&'static str),

    /// The phone input does not normalize to a valid mobile number.
    #[error("Please enter a valid mobile phone number")]
    InvalidPhone,

    /// The host bridge refused the order payload.
    #[error("The app could not hand the order to the host")]
    BridgeRejected,
}

/// A validated order, ready to submit.
///
/// Construction is the validation step: blank fields and unparseable
/// phone numbers never make it into a draft.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub full_name: String,
    pub phone: CanonicalPhone,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<TwaUser>,
}

impl OrderDraft {
    /// Validate raw form input into a draft.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyField` for blank fields and
    /// `CheckoutError::InvalidPhone` when the phone input does not
    /// canonicalize.
    pub fn new(
        full_name: &str,
        phone_input: &str,
        address: &str,
        user: Option<TwaUser>,
    ) -> Result<Self, CheckoutError> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(CheckoutError::EmptyField("name"));
        }
        let address = address.trim();
        if address.is_empty() {
            return Err(CheckoutError::EmptyField("address"));
        }
        let phone = CanonicalPhone::parse(phone_input).ok_or(CheckoutError::InvalidPhone)?;
        Ok(Self {
            full_name: full_name.to_owned(),
            phone,
            address: address.to_owned(),
            user,
        })
    }
}

/// Order payload for the host-native flow: the chat layer already knows
/// the user, so only the form fields travel.
#[derive(Serialize)]
struct BridgeOrder<'a> {
    full_name: &'a str,
    phone: &'a CanonicalPhone,
    address: &'a str,
}

/// Successful order-creation response.
#[derive(Debug, Deserialize)]
struct OrderCreated {
    order_id: OrderId,
}

/// Failure response body.
#[derive(Debug, Deserialize)]
struct ApiFailure {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the storefront order API.
#[derive(Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CheckoutClient {
    /// Create a new checkout client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MiniAppConfig) -> Result<Self, CheckoutError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// Submit the order over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Rejected` with the server's message when
    /// the API answers with a failure status, or `CheckoutError::Http`
    /// when the request itself fails.
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<OrderId, CheckoutError> {
        let url = self.base_url.join("api/create_order")?;
        let response = self.client.post(url).json(draft).send().await?;
        let status = response.status();

        if status.is_success() {
            let created: OrderCreated = response.json().await?;
            return Ok(created.order_id);
        }

        let message = response
            .json::<ApiFailure>()
            .await
            .ok()
            .and_then(|failure| failure.message)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
        Err(CheckoutError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Full submit flow against the host UI: progress on the main
    /// button, alert on both outcomes, re-enabled button on failure so
    /// the user can retry.
    ///
    /// Clearing the cart after a successful order is the caller's job.
    ///
    /// # Errors
    ///
    /// Propagates the `create_order` error after restoring the submit
    /// control.
    pub async fn submit(
        &self,
        bridge: &dyn WebApp,
        draft: &OrderDraft,
    ) -> Result<OrderId, CheckoutError> {
        let button = bridge.main_button();
        button.show_progress();
        button.disable();

        match self.create_order(draft).await {
            Ok(order_id) => {
                bridge.show_alert(&format!("Your order #{order_id} has been created!"));
                bridge.close();
                Ok(order_id)
            }
            Err(e) => {
                bridge.show_alert(&format!("Something went wrong: {e}"));
                button.hide_progress();
                button.enable();
                Err(e)
            }
        }
    }
}

/// Hand the order to the host's chat layer instead of the HTTP API.
///
/// # Errors
///
/// Returns `CheckoutError::BridgeRejected` when the host declines the
/// payload (or there is no host at all).
pub fn send_via_bridge(bridge: &dyn WebApp, draft: &OrderDraft) -> Result<(), CheckoutError> {
    let payload = BridgeOrder {
        full_name: &draft.full_name,
        phone: &draft.phone,
        address: &draft.address,
    };
    let json = serde_json::to_string(&payload).map_err(|e| {
        tracing::debug!(error = %e, "Bridge order serialization failed");
        CheckoutError::BridgeRejected
    })?;
    if bridge.send_data(&json) {
        Ok(())
    } else {
        Err(CheckoutError::BridgeRejected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use crate::bridge::{EventHandler, InitData, MainButton, NullMainButton, NullWebApp, WebAppEvent};

    use super::*;

    #[test]
    fn test_draft_requires_fields() {
        assert!(matches!(
            OrderDraft::new("  ", "79991234567", "addr", None),
            Err(CheckoutError::EmptyField("name"))
        ));
        assert!(matches!(
            OrderDraft::new("Ada", "79991234567", "", None),
            Err(CheckoutError::EmptyField("address"))
        ));
        assert!(matches!(
            OrderDraft::new("Ada", "12345", "addr", None),
            Err(CheckoutError::InvalidPhone)
        ));
    }

    #[test]
    fn test_draft_canonicalizes_phone_and_trims() {
        let draft = OrderDraft::new(" Ada L ", "8 (999) 123-45-67", " Street 1 ", None).unwrap();
        assert_eq!(draft.full_name, "Ada L");
        assert_eq!(draft.address, "Street 1");
        assert_eq!(draft.phone.as_str(), "79991234567");
    }

    #[test]
    fn test_draft_serializes_expected_payload() {
        let draft = OrderDraft::new("Ada", "9991234567", "Street 1", None).unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["full_name"], "Ada");
        assert_eq!(json["phone"], "79991234567");
        assert_eq!(json["address"], "Street 1");
        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_response_shapes() {
        let created: OrderCreated = serde_json::from_str(r#"{"order_id":1007}"#).unwrap();
        assert_eq!(created.order_id, OrderId::new(1007));

        let failure: ApiFailure = serde_json::from_str(r#"{"message":"out of stock"}"#).unwrap();
        assert_eq!(failure.message.as_deref(), Some("out of stock"));

        let empty: ApiFailure = serde_json::from_str("{}").unwrap();
        assert!(empty.message.is_none());
    }

    /// Bridge double that records `send_data` payloads.
    #[derive(Default)]
    struct RecordingBridge {
        sent: Mutex<Vec<String>>,
    }

    impl WebApp for RecordingBridge {
        fn ready(&self) {}
        fn expand(&self) {}
        fn set_header_color(&self, _color: &str) {}
        fn set_background_color(&self, _color: &str) {}
        fn init_data(&self) -> Option<InitData> {
            None
        }
        fn main_button(&self) -> &dyn MainButton {
            &NullMainButton
        }
        fn on_event(&self, _event: WebAppEvent, _handler: EventHandler) {}
        fn show_alert(&self, _text: &str) {}
        fn send_data(&self, payload: &str) -> bool {
            self.sent.lock().unwrap().push(payload.to_owned());
            true
        }
        fn close(&self) {}
    }

    #[test]
    fn test_send_via_bridge_omits_user() {
        let bridge = RecordingBridge::default();
        let draft = OrderDraft::new("Ada", "79991234567", "Street 1", None).unwrap();
        send_via_bridge(&bridge, &draft).unwrap();

        let sent = bridge.sent.lock().unwrap();
        let payload: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(payload["phone"], "79991234567");
        assert!(payload.get("user").is_none());
    }

    #[test]
    fn test_send_via_bridge_reports_absent_host() {
        let draft = OrderDraft::new("Ada", "79991234567", "Street 1", None).unwrap();
        assert!(matches!(
            send_via_bridge(&NullWebApp, &draft),
            Err(CheckoutError::BridgeRejected)
        ));
    }
}
