//! WINNER.TO moderation console library.
//!
//! Operators sign in with their identifier, review pending privilege purchase
//! requests and approve or reject them. All authorization happens in the
//! remote admin backend; this crate only forwards the identifier.
//!
//! # Security
//!
//! The operator identifier is a bearer credential:
//! - It is persisted in plain JSON in the operator's config directory
//! - It is sent as a sensitive header on every admin call
//! - It never appears in `Debug` output or logs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod components;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod notifications;
pub mod session;

pub use client::{AdminApi, AdminClient};
pub use config::{AdminConfig, ConfigError, NotificationPolicy};
pub use console::{ConsoleSnapshot, ModerationConsole, ModerationOutcome};
pub use error::AdminApiError;
pub use notifications::{Notification, NotificationLog, NotificationVariant, Notifier};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};
