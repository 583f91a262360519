//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SITE_ORIGIN` - Public origin of the site, used as the Steam login realm
//! - `PURCHASE_API_URL` - Purchase endpoint (required for purchases)
//! - `AUTH_API_URL` - Auth backend base URL (required for profile lookups)

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

/// Storefront configuration.
///
/// Every endpoint is optional at load time; commands that need one ask for it
/// through the accessor, which reports the missing variable.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Public site origin, without a trailing slash.
    pub site_origin: Option<String>,
    /// Purchase endpoint, without a trailing slash.
    pub purchase_api_url: Option<String>,
    /// Auth backend base URL, without a trailing slash.
    pub auth_api_url: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but is not an http(s) URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional_url = |name: &str| -> Result<Option<String>, ConfigError> {
            lookup(name)
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| validate_http_url(name, raw.trim()))
                .transpose()
        };

        Ok(Self {
            site_origin: optional_url("SITE_ORIGIN")?,
            purchase_api_url: optional_url("PURCHASE_API_URL")?,
            auth_api_url: optional_url("AUTH_API_URL")?,
        })
    }

    /// Purchase endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `PURCHASE_API_URL` is unset.
    pub fn purchase_api_url(&self) -> Result<&str, ConfigError> {
        self.purchase_api_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("PURCHASE_API_URL".to_string()))
    }

    /// Auth backend base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `AUTH_API_URL` is unset.
    pub fn auth_api_url(&self) -> Result<&str, ConfigError> {
        self.auth_api_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_API_URL".to_string()))
    }
}

fn validate_http_url(var_name: &str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
