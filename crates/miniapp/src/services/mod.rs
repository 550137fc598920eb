//! HTTP service clients the mini-app produces requests for.
//!
//! Both clients talk to the storefront API configured via
//! [`crate::config::MiniAppConfig`].

pub mod auth;
pub mod checkout;

pub use auth::{AuthClient, AuthError, AuthSession};
pub use checkout::{CheckoutClient, CheckoutError, OrderDraft};
