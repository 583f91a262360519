//! Storefront commands.
//!
//! # Usage
//!
//! ```bash
//! winner store catalog
//! winner store login-url --origin https://winner.to
//! winner store purchase --steam-id 76561198000000001 --tier Nice --duration 1month --proof "sbp 0412"
//! winner store profile 76561198000000001
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_ORIGIN` - Default origin for `login-url`
//! - `PURCHASE_API_URL` - Purchase endpoint
//! - `AUTH_API_URL` - Auth backend base URL

use std::fmt::Write as _;

use thiserror::Error;
use winner_core::{DurationCategory, PrivilegeTier};
use winner_storefront::{ConfigError, StoreClient, StorefrontConfig, StorefrontError, catalog};

use crate::output::print;

/// Errors that can occur during storefront commands.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Neither `--origin` nor `SITE_ORIGIN` was given.
    #[error("No origin: pass --origin or set SITE_ORIGIN")]
    MissingOrigin,

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Print every tier with its prices and features.
pub fn show_catalog() -> Result<(), StoreError> {
    let mut out = String::new();
    for entry in catalog() {
        let marker = if entry.popular { " (popular)" } else { "" };
        let _ = writeln!(out, "{} - tier {}{marker}", entry.tier, entry.tier.rank());
        for offer in &entry.offers {
            let _ = writeln!(out, "  {:<8} {}", offer.duration.label(), offer.price);
        }
        for feature in entry.features {
            let _ = writeln!(out, "  * {feature}");
        }
        out.push('\n');
    }
    print(&out)?;
    Ok(())
}

/// Print the Steam sign-in URL.
pub fn login_url(origin: Option<&str>) -> Result<(), StoreError> {
    let config = StorefrontConfig::from_env()?;
    let origin = origin
        .map(ToString::to_string)
        .or(config.site_origin)
        .ok_or(StoreError::MissingOrigin)?;

    print(&winner_storefront::steam_login_url(&origin)?)?;
    Ok(())
}

/// Submit a purchase request.
pub async fn purchase(
    steam_id: &str,
    tier: PrivilegeTier,
    duration: DurationCategory,
    proof: &str,
) -> Result<(), StoreError> {
    let config = StorefrontConfig::from_env()?;
    let client = StoreClient::new(Some(config.purchase_api_url()?), None);

    let receipt = client
        .submit_purchase(steam_id, tier, duration, proof)
        .await?;

    print(&format!(
        "Request #{} created at {}",
        receipt.request_id,
        receipt.created_at.display_minutes()
    ))?;
    if let Some(message) = receipt.message {
        print(&message)?;
    }
    Ok(())
}

/// Print a player's profile and active privileges.
pub async fn profile(steam_id: &str) -> Result<(), StoreError> {
    let config = StorefrontConfig::from_env()?;
    let client = StoreClient::new(None, Some(config.auth_api_url()?));

    let profile = client.fetch_profile(steam_id).await?;

    let mut out = format!(
        "{} ({})\n",
        profile.user.steam_name, profile.user.steam_id
    );
    if profile.user.is_admin {
        out.push_str("Administrator\n");
    }
    if profile.privileges.is_empty() {
        out.push_str("No active privileges\n");
    }
    for privilege in &profile.privileges {
        let until = privilege
            .expires_at
            .map_or_else(|| "forever".to_string(), |t| format!("until {}", t.display_date()));
        let _ = writeln!(out, "  {} {until}", privilege.privilege_type);
    }
    print(&out)?;
    Ok(())
}
