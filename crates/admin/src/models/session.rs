//! Session-related types for the operator console.
//!
//! The persisted session is a JSON document holding the operator identifier
//! under a fixed well-known key.

use serde::{Deserialize, Serialize};

/// On-disk session document.
///
/// No expiry, no encryption and no schema version: presence of the
/// identifier is the whole session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDocument {
    /// The operator identifier, stored verbatim.
    #[serde(rename = "admin_steam_id", default, skip_serializing_if = "Option::is_none")]
    pub admin_steam_id: Option<String>,
}

/// Session keys for persisted console state.
pub mod keys {
    /// Key the operator identifier is stored under.
    pub const ADMIN_IDENTIFIER: &str = "admin_steam_id";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uses_well_known_key() {
        let doc = SessionDocument {
            admin_steam_id: Some("76561198000000000".to_string()),
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json[keys::ADMIN_IDENTIFIER], "76561198000000000");
    }

    #[test]
    fn test_empty_document_parses() {
        let doc: SessionDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.admin_steam_id.is_none());
    }
}
