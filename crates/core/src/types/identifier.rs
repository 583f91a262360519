//! Operator identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OperatorId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The input is empty or contains only whitespace.
    #[error("operator identifier cannot be blank")]
    Blank,
}

/// The identifier an operator signs in to the moderation console with.
///
/// In practice this is a 17-digit SteamID64, but no format is enforced: the
/// backend is the only authority on whether an identifier is an admin. The
/// value is forwarded verbatim on every admin request, so it is treated as a
/// bearer credential and redacted from `Debug` output.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
/// - Stored exactly as typed (surrounding whitespace is not trimmed)
///
/// ## Examples
///
/// ```
/// use winner_core::OperatorId;
///
/// assert!(OperatorId::parse("76561198000000000").is_ok());
/// assert!(OperatorId::parse("").is_err());
/// assert!(OperatorId::parse("   ").is_err());
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OperatorId(String);

impl OperatorId {
    /// Parse an `OperatorId` from operator input.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Blank`] if the input is empty or
    /// whitespace-only.
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        if s.trim().is_empty() {
            return Err(IdentifierError::Blank);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OperatorId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OperatorId").field(&"[REDACTED]").finish()
    }
}

impl std::str::FromStr for OperatorId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OperatorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
