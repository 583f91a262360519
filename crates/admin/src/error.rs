//! Errors raised by the admin backend client.

use thiserror::Error;

/// Errors that can occur when calling the admin backend.
#[derive(Debug, Error)]
pub enum AdminApiError {
    /// No response was received (connection refused, DNS, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// `message` is the `error` field of the JSON body, if there was one.
    #[error("API error: {status} - {}", message.as_deref().unwrap_or("no error message"))]
    Api { status: u16, message: Option<String> },

    /// The backend answered, but the body could not be decoded.
    #[error("Malformed response ({status}): {detail}")]
    MalformedResponse { status: u16, detail: String },

    /// The operator identifier cannot be sent as a header value.
    #[error("Operator identifier is not a valid header value")]
    InvalidIdentifier,
}

impl AdminApiError {
    /// Whether the backend produced an interpretable error answer.
    ///
    /// Everything else means the caller got no usable response at all.
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Server-reported error text, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
