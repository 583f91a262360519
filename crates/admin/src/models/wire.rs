//! Request and response envelopes of the admin backend.

use serde::{Deserialize, Serialize};
use winner_core::PurchaseRequestId;

use super::{PurchaseRequest, UserSummary};

/// `GET /requests` success body.
#[derive(Debug, Default, Deserialize)]
pub struct RequestsEnvelope {
    #[serde(default)]
    pub requests: Option<Vec<PurchaseRequest>>,
}

/// `GET /users` success body.
#[derive(Debug, Default, Deserialize)]
pub struct UsersEnvelope {
    #[serde(default)]
    pub users: Option<Vec<UserSummary>>,
}

/// Body of `POST /approve` and `POST /reject`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModerationBody {
    pub request_id: PurchaseRequestId,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}
