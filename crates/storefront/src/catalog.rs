//! The privilege catalog shown on the landing page.

use winner_core::{DurationCategory, Price, PrivilegeTier};

/// One purchasable duration of a tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub duration: DurationCategory,
    pub price: Price,
}

/// A tier as presented to players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub tier: PrivilegeTier,
    pub offers: Vec<Offer>,
    pub features: &'static [&'static str],
    /// Highlighted as the most popular choice.
    pub popular: bool,
}

impl CatalogEntry {
    /// Price for a duration, if offered.
    #[must_use]
    pub fn price(&self, duration: DurationCategory) -> Option<&Price> {
        self.offers
            .iter()
            .find(|offer| offer.duration == duration)
            .map(|offer| &offer.price)
    }
}

const fn features(tier: PrivilegeTier) -> &'static [&'static str] {
    match tier {
        PrivilegeTier::Low => &[
            "Bunny hop",
            "1 syringe",
            "'Low' tag",
            "Pattern access",
            "Float access in the skin changer",
        ],
        PrivilegeTier::Nice => &[
            "Everything in Low",
            "Double jump on every server",
            "2 syringes instead of 1",
            "Faster bunny hop",
            "Paint access",
        ],
        PrivilegeTier::Escape => &[
            "Everything in Low and Nice",
            "3 syringes",
            "Triple jump",
            "Maximum bunny hop speed",
            "Artifact access (speed, extra jump, gravity and more)",
        ],
    }
}

/// The full catalog, cheapest tier first.
#[must_use]
pub fn catalog() -> Vec<CatalogEntry> {
    PrivilegeTier::ALL
        .iter()
        .map(|&tier| CatalogEntry {
            tier,
            offers: tier
                .offers()
                .iter()
                .map(|&(duration, rubles)| Offer {
                    duration,
                    price: Price::rubles(rubles),
                })
                .collect(),
            features: features(tier),
            popular: tier == PrivilegeTier::Nice,
        })
        .collect()
}

/// Check that a tier is sold for a duration and return its price.
///
/// # Errors
///
/// Returns [`StorefrontError::UnavailableCombination`](crate::StorefrontError::UnavailableCombination)
/// for combinations the store does not sell.
pub fn quote(
    tier: PrivilegeTier,
    duration: DurationCategory,
) -> Result<Price, crate::StorefrontError> {
    tier.price(duration)
        .ok_or(crate::StorefrontError::UnavailableCombination { tier, duration })
}
