//! Unified error handling.
//!
//! Storage problems never show up here: backend absence, read/write
//! failures, and malformed payloads are swallowed inside the storage and
//! cart layers with debug logs, and invalid mutation input is clamped.
//! What remains - checkout, auth bootstrap, configuration - funnels into
//! [`AppError`], and only checkout failures carry a message meant for
//! the user's eyes.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the mini-app.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order validation or submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Auth bootstrap failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Message suitable for a user-facing alert or toast.
    ///
    /// Checkout failures surface their validation or server-provided
    /// message; everything else maps to a generic fallback so internals
    /// never leak into the UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(err) => match err {
                CheckoutError::Rejected { message, .. } => message.clone(),
                CheckoutError::EmptyField(_)
                | CheckoutError::InvalidPhone
                | CheckoutError::BridgeRejected => err.to_string(),
                CheckoutError::Http(_) | CheckoutError::Endpoint(_) => {
                    "Could not submit the order, please try again".to_string()
                }
            },
            Self::Auth(_) | Self::Config(_) => "Something went wrong".to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
