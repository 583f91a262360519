//! Registered players as listed by the admin backend.

use serde::{Deserialize, Serialize};
use winner_core::{Timestamp, UserId};

/// A registered player, read-only from the console's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub steam_id: String,
    pub steam_name: String,
    #[serde(default)]
    pub steam_avatar: Option<String>,
    /// Registration time.
    pub created_at: Timestamp,
    /// Number of currently active privileges.
    #[serde(default)]
    pub privilege_count: u32,
}
