//! WINNER.TO storefront library.
//!
//! The player-facing side of the privilege store: the catalog and price
//! table, the Steam sign-in redirect, and clients for submitting purchase
//! requests and looking up a player's profile.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod steam;

pub use catalog::{CatalogEntry, Offer, catalog, quote};
pub use client::StoreClient;
pub use config::{ConfigError, StorefrontConfig};
pub use error::StorefrontError;
pub use models::{ActivePrivilege, Player, PlayerProfile, PurchaseReceipt, PurchaseSubmission};
pub use steam::steam_login_url;
