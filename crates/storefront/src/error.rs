//! Storefront error type.

use thiserror::Error;
use winner_core::{DurationCategory, PrivilegeTier};

/// Errors raised by storefront operations.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The site origin is not an absolute http(s) URL.
    #[error("Invalid site origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The tier is not sold for that duration.
    #[error("{tier} is not offered for {duration}")]
    UnavailableCombination {
        tier: PrivilegeTier,
        duration: DurationCategory,
    },

    /// The endpoint an operation needs is not configured.
    #[error("Endpoint not configured: set {0}")]
    MissingEndpoint(&'static str),

    /// The Steam id is blank or cannot be sent as a header value.
    #[error("Invalid Steam id")]
    InvalidSteamId,

    /// No response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {}", message.as_deref().unwrap_or("no error message"))]
    Api { status: u16, message: Option<String> },

    /// The backend answered, but the body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}
