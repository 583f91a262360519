//! Read models and wire payloads for the admin backend.
//!
//! Everything here is externally sourced: the console never creates or
//! mutates these records locally, it only replaces them with what the backend
//! returns.

pub mod purchase_request;
pub mod session;
pub mod user;
pub mod wire;

pub use purchase_request::{PurchaseRequest, RequestUser};
pub use user::UserSummary;
