//! WINNER.TO Core - Shared types library.
//!
//! This crate provides common types used across all WINNER.TO components:
//! - `storefront` - Privilege catalog, Steam login and player-facing API clients
//! - `admin` - Operator moderation console
//! - `cli` - Command-line driver for both
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, operator identifiers, privileges,
//!   prices, timestamps and request statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
