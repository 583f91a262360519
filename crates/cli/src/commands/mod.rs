//! Command implementations.

pub mod admin;
pub mod store;
