//! The moderation console.
//!
//! [`ModerationConsole`] owns the operator session, the two read models
//! (pending purchase requests and users) and the approve/reject actions.
//! Operations take `&self` and report failures as notifications or log
//! lines rather than returning errors.
//!
//! ```text
//! restore_session / login ──► load ──► { GET /requests, GET /users }
//!                                 ▲
//! approve / reject ──► POST ──────┘ (on success)
//! ```

mod in_flight;
mod loader;
mod moderation;
mod session_gate;

#[cfg(test)]
pub(crate) mod fake_api;

use tokio::sync::RwLock;
use winner_core::OperatorId;

use crate::client::AdminApi;
use crate::config::NotificationPolicy;
use crate::models::{PurchaseRequest, UserSummary};
use crate::notifications::Notifier;
use crate::session::SessionStore;

use in_flight::InFlightRequests;

pub use moderation::ModerationOutcome;

/// Mutable console state. Never held across an `.await`.
#[derive(Debug, Default)]
struct ConsoleState {
    session: Option<OperatorId>,
    /// Bumped on login and logout so loads started under an earlier
    /// session can be recognised and discarded.
    generation: u64,
    requests: Vec<PurchaseRequest>,
    users: Vec<UserSummary>,
    loads_in_flight: usize,
}

/// Point-in-time copy of what the console shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleSnapshot {
    pub authenticated: bool,
    pub loading: bool,
    pub requests: Vec<PurchaseRequest>,
    pub users: Vec<UserSummary>,
}

impl ConsoleSnapshot {
    /// Count shown on the requests tab badge.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.requests.len()
    }
}

/// Operator console over an admin backend, a session store and a notifier.
pub struct ModerationConsole<A, S, N> {
    api: A,
    store: S,
    notifier: N,
    policy: NotificationPolicy,
    state: RwLock<ConsoleState>,
    in_flight: InFlightRequests,
}

impl<A, S, N> ModerationConsole<A, S, N>
where
    A: AdminApi,
    S: SessionStore,
    N: Notifier,
{
    /// Create an unauthenticated console. Call
    /// [`restore_session`](Self::restore_session) to pick up a stored session.
    pub fn new(api: A, store: S, notifier: N, policy: NotificationPolicy) -> Self {
        Self {
            api,
            store,
            notifier,
            policy,
            state: RwLock::new(ConsoleState::default()),
            in_flight: InFlightRequests::default(),
        }
    }

    pub const fn policy(&self) -> NotificationPolicy {
        self.policy
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    /// Identifier of the signed-in operator.
    pub async fn operator(&self) -> Option<OperatorId> {
        self.state.read().await.session.clone()
    }

    /// Copy of the current read models and flags.
    pub async fn snapshot(&self) -> ConsoleSnapshot {
        let state = self.state.read().await;
        ConsoleSnapshot {
            authenticated: state.session.is_some(),
            loading: state.loads_in_flight > 0,
            requests: state.requests.clone(),
            users: state.users.clone(),
        }
    }
}

impl<A, S, N> std::fmt::Debug for ModerationConsole<A, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationConsole")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
