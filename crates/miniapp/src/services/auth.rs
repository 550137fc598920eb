//! Auth bootstrap against the storefront API.
//!
//! The host hands the app a signed init payload; forwarding it verbatim
//! to the validation endpoint is the only authentication step the
//! mini-app performs. Everything else about token exchange lives on the
//! server.

use reqwest::header::CONTENT_TYPE;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use nexus_gear_core::UserId;

use crate::bridge::WebApp;
use crate::config::MiniAppConfig;

/// Errors that can occur during auth bootstrap.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built from the configured base.
    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The host provided no init payload; nothing to validate.
    #[error("Host bridge provided no init data")]
    MissingInitData,

    /// The server did not accept the init payload.
    #[error("Validation rejected with status {0}")]
    Rejected(String),

    /// The server said ok but omitted the token or user id.
    #[error("Validation response incomplete")]
    Incomplete,
}

/// A validated session.
///
/// The endpoint only answers `ok` for admin users, so a successful
/// bootstrap implies admin access.
pub struct AuthSession {
    /// Bearer token for subsequent admin API calls.
    pub token: SecretString,
    /// Server-side user id.
    pub user_id: UserId,
    /// Always true on a successful bootstrap.
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    status: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user_id: Option<i64>,
}

/// Client for the init-data validation endpoint.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MiniAppConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    /// POST the host's raw init payload for server-side validation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` for any status other than `ok`, or
    /// transport/shape errors.
    pub async fn validate_init_data(&self, raw_init_data: &str) -> Result<AuthSession, AuthError> {
        let url = self.base_url.join("api/v1/auth/telegram/validate")?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(raw_init_data.to_owned())
            .send()
            .await?;
        let body: ValidateResponse = response.json().await?;
        session_from_response(body)
    }

    /// Bootstrap from the bridge, skipping the request entirely when the
    /// host provided no init payload.
    ///
    /// # Errors
    ///
    /// `AuthError::MissingInitData` without a host payload, otherwise as
    /// [`AuthClient::validate_init_data`].
    pub async fn bootstrap_from_bridge(&self, bridge: &dyn WebApp) -> Result<AuthSession, AuthError> {
        let init = bridge.init_data().ok_or(AuthError::MissingInitData)?;
        self.validate_init_data(&init.raw).await
    }
}

fn session_from_response(body: ValidateResponse) -> Result<AuthSession, AuthError> {
    if body.status != "ok" {
        return Err(AuthError::Rejected(body.status));
    }
    let token = body.token.ok_or(AuthError::Incomplete)?;
    let user_id = body.user_id.ok_or(AuthError::Incomplete)?;
    Ok(AuthSession {
        token: SecretString::from(token),
        user_id: UserId::new(user_id),
        is_admin: true,
    })
}
