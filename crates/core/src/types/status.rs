//! Status enums for purchase requests.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a purchase request.
///
/// `Pending` is the only non-terminal state: an operator decision moves it to
/// `Approved` (the privilege is activated) or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// An operator's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

/// Error returned when a decision is applied to an already processed request.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("request is already {from}, cannot {decision}")]
pub struct TransitionError {
    /// Status the request was in.
    pub from: PurchaseStatus,
    /// Decision that was refused.
    pub decision: ModerationDecision,
}

impl PurchaseStatus {
    /// Whether no further decision can change this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Apply an operator decision.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the request is not pending.
    pub const fn apply(self, decision: ModerationDecision) -> Result<Self, TransitionError> {
        match (self, decision) {
            (Self::Pending, ModerationDecision::Approve) => Ok(Self::Approved),
            (Self::Pending, ModerationDecision::Reject) => Ok(Self::Rejected),
            (from, decision) => Err(TransitionError { from, decision }),
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::fmt::Display for ModerationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}
