//! Player-facing payloads of the purchase and auth backends.

use serde::{Deserialize, Serialize};
use winner_core::{DurationCategory, PrivilegeTier, PurchaseRequestId, Timestamp, UserId};

/// Body of a purchase submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseSubmission {
    pub privilege_type: PrivilegeTier,
    pub duration_type: DurationCategory,
    /// Free-form reference to the payment (transfer id, chat handle, ...).
    pub payment_proof: String,
}

/// Backend acknowledgement of a submitted purchase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchaseReceipt {
    pub request_id: PurchaseRequestId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub message: Option<String>,
}

/// A player and their active privileges.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerProfile {
    pub user: Player,
    #[serde(default)]
    pub privileges: Vec<ActivePrivilege>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Player {
    pub id: UserId,
    pub steam_id: String,
    pub steam_name: String,
    #[serde(default)]
    pub steam_avatar: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// A privilege currently held by a player.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivePrivilege {
    #[serde(rename = "type")]
    pub privilege_type: String,
    /// `None` for permanent privileges.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub activated_at: Option<Timestamp>,
}

impl ActivePrivilege {
    #[must_use]
    pub fn tier(&self) -> Option<PrivilegeTier> {
        self.privilege_type.parse().ok()
    }

    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }
}

impl PlayerProfile {
    /// Highest tier the player holds, if any.
    #[must_use]
    pub fn best_tier(&self) -> Option<PrivilegeTier> {
        self.privileges
            .iter()
            .filter_map(ActivePrivilege::tier)
            .max_by_key(|tier| tier.rank())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}
