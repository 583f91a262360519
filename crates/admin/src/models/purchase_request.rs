//! Pending purchase requests as listed by the admin backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use winner_core::{
    CurrencyCode, DurationCategory, Price, PrivilegeTier, PurchaseRequestId, PurchaseStatus,
    Timestamp, UserId,
};

/// A purchase awaiting an operator decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub id: PurchaseRequestId,
    /// Tier name. Kept as a string so unknown tiers still render.
    pub privilege_type: String,
    /// Duration wire name (`2weeks`, `1month`, `forever`).
    pub duration_type: String,
    /// Price in rubles.
    pub price: Decimal,
    /// Reference to the payment proof the player sent out of band.
    #[serde(default)]
    pub payment_proof: Option<String>,
    #[serde(default)]
    pub status: Option<PurchaseStatus>,
    pub created_at: Timestamp,
    /// Summary of the requesting player.
    pub user: RequestUser,
}

/// Player summary embedded in a [`PurchaseRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUser {
    #[serde(default)]
    pub id: Option<UserId>,
    pub steam_id: String,
    pub steam_name: String,
    #[serde(default)]
    pub steam_avatar: Option<String>,
}

impl PurchaseRequest {
    /// The tier, if the name is one the store sells.
    #[must_use]
    pub fn tier(&self) -> Option<PrivilegeTier> {
        self.privilege_type.parse().ok()
    }

    /// The duration, if the wire name is a known category.
    #[must_use]
    pub fn duration(&self) -> Option<DurationCategory> {
        self.duration_type.parse().ok()
    }

    /// Human-readable duration; unknown values are shown verbatim.
    #[must_use]
    pub fn duration_label(&self) -> &str {
        DurationCategory::label_for(&self.duration_type)
    }

    /// Price with currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.price, CurrencyCode::RUB)
    }
}
