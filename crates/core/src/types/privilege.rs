//! Privilege tiers, duration categories and the price table.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Error returned when a string is not a known privilege tier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown privilege tier: {0} (expected Low, Nice or Escape)")]
pub struct ParseTierError(pub String);

/// Error returned when a string is not a known duration category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown duration: {0} (expected 2weeks, 1month or forever)")]
pub struct ParseDurationError(pub String);

/// How long a purchased privilege lasts.
///
/// Serialized with the backend's wire names (`2weeks`, `1month`, `forever`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationCategory {
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "forever")]
    Forever,
}

impl DurationCategory {
    /// All duration categories, shortest first.
    pub const ALL: [Self; 3] = [Self::TwoWeeks, Self::OneMonth, Self::Forever];

    /// Wire name used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoWeeks => "2weeks",
            Self::OneMonth => "1month",
            Self::Forever => "forever",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoWeeks => "2 weeks",
            Self::OneMonth => "1 month",
            Self::Forever => "Forever",
        }
    }

    /// Render a wire value as a label, keeping unknown values verbatim.
    #[must_use]
    pub fn label_for(raw: &str) -> &str {
        raw.parse::<Self>().map_or(raw, |duration| duration.label())
    }
}

impl fmt::Display for DurationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DurationCategory {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2weeks" => Ok(Self::TwoWeeks),
            "1month" => Ok(Self::OneMonth),
            "forever" => Ok(Self::Forever),
            _ => Err(ParseDurationError(s.to_owned())),
        }
    }
}

/// A purchasable privilege tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivilegeTier {
    Low,
    Nice,
    Escape,
}

impl PrivilegeTier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Nice, Self::Escape];

    /// Tier name as sent to and received from the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Nice => "Nice",
            Self::Escape => "Escape",
        }
    }

    /// Tier rank, 1 being the entry tier.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Nice => 2,
            Self::Escape => 3,
        }
    }

    /// Durations offered for this tier with their price in rubles.
    #[must_use]
    pub const fn offers(self) -> &'static [(DurationCategory, u32)] {
        match self {
            Self::Low => &[
                (DurationCategory::TwoWeeks, 20),
                (DurationCategory::Forever, 100),
            ],
            Self::Nice => &[
                (DurationCategory::OneMonth, 100),
                (DurationCategory::Forever, 300),
            ],
            Self::Escape => &[
                (DurationCategory::OneMonth, 200),
                (DurationCategory::Forever, 550),
            ],
        }
    }

    /// Price for a duration, or `None` if the tier is not sold for it.
    #[must_use]
    pub fn price(self, duration: DurationCategory) -> Option<Price> {
        self.offers()
            .iter()
            .find(|(offered, _)| *offered == duration)
            .map(|(_, rubles)| Price::rubles(*rubles))
    }
}

impl fmt::Display for PrivilegeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrivilegeTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTierError(s.to_owned()))
    }
}
