//! Core types for WINNER.TO.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod identifier;
pub mod price;
pub mod privilege;
pub mod status;
pub mod timestamp;

pub use id::*;
pub use identifier::{IdentifierError, OperatorId};
pub use price::{CurrencyCode, Price};
pub use privilege::{DurationCategory, ParseDurationError, ParseTierError, PrivilegeTier};
pub use status::*;
pub use timestamp::Timestamp;
