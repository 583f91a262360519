//! Loading of the two read models.

use tracing::{debug, error, instrument, warn};
use winner_core::OperatorId;

use super::ModerationConsole;
use crate::client::AdminApi;
use crate::config::NotificationPolicy;
use crate::error::AdminApiError;
use crate::notifications::{Notification, Notifier};
use crate::session::SessionStore;

pub(super) const REQUESTS_LOAD_FAILED: &str = "Could not load purchase requests";
pub(super) const USERS_LOAD_FAILED: &str = "Could not load users";

impl<A, S, N> ModerationConsole<A, S, N>
where
    A: AdminApi,
    S: SessionStore,
    N: Notifier,
{
    /// Fetch pending requests and users concurrently.
    ///
    /// Each fetch applies its own result as soon as it settles; the loading
    /// flag stays up until both have. Results of a load started under a
    /// session that has since ended are dropped. Does nothing when signed out.
    #[instrument(skip(self))]
    pub async fn load(&self) {
        let started = {
            let mut state = self.state.write().await;
            state.session.clone().map(|operator| {
                state.loads_in_flight += 1;
                (operator, state.generation)
            })
        };

        let Some((operator, generation)) = started else {
            debug!("Not signed in, skipping load");
            return;
        };

        tokio::join!(
            self.load_requests(&operator, generation),
            self.load_users(&operator, generation),
        );

        let mut state = self.state.write().await;
        if state.generation == generation {
            state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
        }
    }

    async fn load_requests(&self, operator: &OperatorId, generation: u64) {
        let result = self.api.pending_requests(operator).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!("Discarding requests loaded under an ended session");
            return;
        }

        match result {
            Ok(requests) => {
                debug!(count = requests.len(), "Pending requests loaded");
                state.requests = requests;
            }
            Err(e) => {
                drop(state);
                self.report_requests_failure(&e);
            }
        }
    }

    async fn load_users(&self, operator: &OperatorId, generation: u64) {
        let result = self.api.users(operator).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!("Discarding users loaded under an ended session");
            return;
        }

        match result {
            Ok(users) => {
                debug!(count = users.len(), "Users loaded");
                state.users = users;
            }
            Err(e) => {
                drop(state);
                self.report_users_failure(&e);
            }
        }
    }

    fn report_requests_failure(&self, e: &AdminApiError) {
        error!(error = %e, "Failed to load purchase requests");

        let notify = e.is_api_error() || self.policy == NotificationPolicy::Unified;
        if notify {
            let description = e.server_message().unwrap_or(REQUESTS_LOAD_FAILED);
            self.notifier
                .notify(Notification::error(Some(description.to_string())));
        }
    }

    fn report_users_failure(&self, e: &AdminApiError) {
        match self.policy {
            NotificationPolicy::Parity => {
                warn!(error = %e, "Failed to load users");
            }
            NotificationPolicy::Unified => {
                error!(error = %e, "Failed to load users");
                let description = e.server_message().unwrap_or(USERS_LOAD_FAILED);
                self.notifier
                    .notify(Notification::error(Some(description.to_string())));
            }
        }
    }
}
