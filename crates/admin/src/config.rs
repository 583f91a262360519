//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_API_URL` - Base URL of the admin backend (e.g. `https://api.example.com/admin`)
//!
//! ## Optional
//! - `ADMIN_IDENTIFIER_HEADER` - Header carrying the operator identifier (default: `X-Admin-Steam-Id`)
//! - `ADMIN_SESSION_FILE` - Where the operator session is persisted
//!   (default: `$XDG_CONFIG_HOME/winner/admin-session.json` or `~/.config/winner/admin-session.json`)
//! - `ADMIN_NOTIFICATION_POLICY` - `parity` or `unified` (default: `parity`)
//! - `ADMIN_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: none)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::session::default_session_path;

/// Header name the deployed backend reads the operator identifier from.
pub const DEFAULT_IDENTIFIER_HEADER: &str = "X-Admin-Steam-Id";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which failures of the console surface as notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPolicy {
    /// Requests-load HTTP errors and every moderation failure notify; network
    /// failures of loads and every users-load failure are only logged.
    /// Moderation HTTP errors without an `error` field notify with no
    /// description.
    #[default]
    Parity,
    /// Every failure notifies, with the server's `error` text when present
    /// and fallback text otherwise.
    Unified,
}

impl std::str::FromStr for NotificationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parity" => Ok(Self::Parity),
            "unified" => Ok(Self::Unified),
            other => Err(format!("expected parity or unified, got {other:?}")),
        }
    }
}

/// Moderation console configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the admin backend, without a trailing slash.
    pub api_url: String,
    /// Header carrying the operator identifier on every request.
    pub identifier_header: String,
    /// File the operator session is persisted to.
    pub session_file: PathBuf,
    /// Which failures surface as notifications.
    pub notification_policy: NotificationPolicy,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("ADMIN_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_API_URL".to_string()))?;
        let api_url = validate_base_url("ADMIN_API_URL", &api_url)?;

        let identifier_header = lookup("ADMIN_IDENTIFIER_HEADER")
            .unwrap_or_else(|| DEFAULT_IDENTIFIER_HEADER.to_string());
        reqwest::header::HeaderName::from_bytes(identifier_header.as_bytes()).map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_IDENTIFIER_HEADER".to_string(), e.to_string())
        })?;

        let session_file = match lookup("ADMIN_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_path(
                lookup("XDG_CONFIG_HOME").as_deref(),
                lookup("HOME").as_deref(),
            )
            .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_SESSION_FILE".to_string()))?,
        };

        let notification_policy = lookup("ADMIN_NOTIFICATION_POLICY")
            .map(|raw| raw.parse::<NotificationPolicy>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_NOTIFICATION_POLICY".to_string(), e))?
            .unwrap_or_default();

        let request_timeout = lookup("ADMIN_REQUEST_TIMEOUT_SECS")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ADMIN_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?
            .map(Duration::from_secs);

        Ok(Self {
            api_url,
            identifier_header,
            session_file,
            notification_policy,
            request_timeout,
        })
    }
}

/// Check that a base URL is absolute http(s) and strip any trailing slash.
pub(crate) fn validate_base_url(var_name: &str, raw: &str) -> Result<String, ConfigError> {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_API_URL", "https://api.example.com/admin/"),
            ("HOME", "/home/operator"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com/admin");
        assert_eq!(config.identifier_header, DEFAULT_IDENTIFIER_HEADER);
        assert_eq!(
            config.session_file,
            PathBuf::from("/home/operator/.config/winner/admin-session.json")
        );
        assert_eq!(config.notification_policy, NotificationPolicy::Parity);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_missing_api_url() {
        let result = AdminConfig::from_lookup(lookup_from(&[("HOME", "/root")]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ADMIN_API_URL"));
    }

    #[test]
    fn test_rejects_non_http_api_url() {
        let result = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_API_URL", "ftp://api.example.com"),
            ("HOME", "/root"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_overrides() {
        let config = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_API_URL", "http://localhost:8080"),
            ("ADMIN_IDENTIFIER_HEADER", "X-Admin-Identifier"),
            ("ADMIN_SESSION_FILE", "/tmp/session.json"),
            ("ADMIN_NOTIFICATION_POLICY", "Unified"),
            ("ADMIN_REQUEST_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.identifier_header, "X-Admin-Identifier");
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.notification_policy, NotificationPolicy::Unified);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_policy() {
        let result = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_API_URL", "http://localhost:8080"),
            ("ADMIN_SESSION_FILE", "/tmp/session.json"),
            ("ADMIN_NOTIFICATION_POLICY", "loud"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref v, _)) if v == "ADMIN_NOTIFICATION_POLICY"));
    }

    #[test]
    fn test_invalid_header_name() {
        let result = AdminConfig::from_lookup(lookup_from(&[
            ("ADMIN_API_URL", "http://localhost:8080"),
            ("ADMIN_SESSION_FILE", "/tmp/session.json"),
            ("ADMIN_IDENTIFIER_HEADER", "bad header"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_no_session_location() {
        let result = AdminConfig::from_lookup(lookup_from(&[(
            "ADMIN_API_URL",
            "http://localhost:8080",
        )]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ADMIN_SESSION_FILE"));
    }
}
