//! Mini-app configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NGS_API_BASE_URL` - Base URL of the storefront API the mini-app
//!   talks to (checkout, auth bootstrap)
//!
//! ## Optional
//! - `NGS_LOCAL_STORE_PATH` - Backing file for the local key-value store
//!   (default: `ngs_local_store.json`)
//! - `NGS_HTTP_TIMEOUT_SECS` - Timeout for checkout/auth requests
//!   (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Mini-app configuration.
#[derive(Debug, Clone)]
pub struct MiniAppConfig {
    /// Base URL for the storefront API.
    pub api_base_url: Url,
    /// Backing file for the local key-value store.
    pub local_store_path: PathBuf,
    /// Timeout applied to checkout and auth requests.
    pub http_timeout: Duration,
}

impl MiniAppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("NGS_API_BASE_URL")?)?;
        let local_store_path =
            PathBuf::from(get_env_or_default("NGS_LOCAL_STORE_PATH", "ngs_local_store.json"));
        let timeout_secs = get_env_or_default("NGS_HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("NGS_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            local_store_path,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and validate the API base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = raw
        .parse::<Url>()
        .map_err(|e| ConfigError::InvalidEnvVar("NGS_API_BASE_URL".to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "NGS_API_BASE_URL".to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_valid() {
        let url = parse_base_url("https://store.example/api").unwrap();
        assert_eq!(url.host_str(), Some("store.example"));
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("mailto:me@example.com").is_err());
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("NGS_TEST_VAR_THAT_DOES_NOT_EXIST", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_missing_env_error_names_the_variable() {
        let err = get_required_env("NGS_TEST_VAR_THAT_DOES_NOT_EXIST").unwrap_err();
        assert!(err.to_string().contains("NGS_TEST_VAR_THAT_DOES_NOT_EXIST"));
    }
}
