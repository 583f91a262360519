//! Approve and reject actions.

use std::fmt;

use tracing::{error, info, instrument, warn};
use winner_core::{ModerationDecision, PurchaseRequestId};

use super::ModerationConsole;
use crate::client::AdminApi;
use crate::config::NotificationPolicy;
use crate::error::AdminApiError;
use crate::notifications::{Notification, Notifier};
use crate::session::SessionStore;

/// What happened to an approve or reject call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// The backend accepted the decision and both lists were reloaded.
    Completed,
    /// The backend refused or could not be reached. An error was notified.
    Failed,
    /// A decision for the same request is still outstanding. Nothing was sent.
    AlreadyInFlight,
    /// No operator is signed in. Nothing was sent.
    NotAuthenticated,
}

impl ModerationOutcome {
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for ModerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::AlreadyInFlight => "already in flight",
            Self::NotAuthenticated => "not authenticated",
        })
    }
}

const fn success_text(decision: ModerationDecision) -> &'static str {
    match decision {
        ModerationDecision::Approve => "Privilege activated",
        ModerationDecision::Reject => "Request rejected",
    }
}

const fn failure_text(decision: ModerationDecision) -> &'static str {
    match decision {
        ModerationDecision::Approve => "Could not activate privilege",
        ModerationDecision::Reject => "Could not reject request",
    }
}

impl<A, S, N> ModerationConsole<A, S, N>
where
    A: AdminApi,
    S: SessionStore,
    N: Notifier,
{
    /// Approve a pending request, activating the privilege.
    pub async fn approve(&self, request_id: PurchaseRequestId) -> ModerationOutcome {
        self.moderate(request_id, ModerationDecision::Approve).await
    }

    /// Reject a pending request.
    pub async fn reject(&self, request_id: PurchaseRequestId) -> ModerationOutcome {
        self.moderate(request_id, ModerationDecision::Reject).await
    }

    #[instrument(skip(self), fields(request_id = %request_id, decision = %decision))]
    async fn moderate(
        &self,
        request_id: PurchaseRequestId,
        decision: ModerationDecision,
    ) -> ModerationOutcome {
        let operator = { self.state.read().await.session.clone() };
        let Some(operator) = operator else {
            warn!("Moderation requested while signed out");
            return ModerationOutcome::NotAuthenticated;
        };

        let Some(ticket) = self.in_flight.acquire(request_id) else {
            warn!("Moderation already in flight for this request");
            return ModerationOutcome::AlreadyInFlight;
        };

        let result = self.api.moderate(&operator, request_id, decision).await;
        drop(ticket);

        match result {
            Ok(()) => {
                info!("Moderation applied");
                self.notifier
                    .notify(Notification::success(success_text(decision)));
                self.load().await;
                ModerationOutcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Moderation failed");
                self.notifier
                    .notify(Notification::error(self.failure_description(&e, decision)));
                ModerationOutcome::Failed
            }
        }
    }

    fn failure_description(&self, e: &AdminApiError, decision: ModerationDecision) -> Option<String> {
        match e {
            AdminApiError::Api {
                message: Some(message),
                ..
            } => Some(message.clone()),
            AdminApiError::Api { message: None, .. }
                if self.policy == NotificationPolicy::Parity =>
            {
                None
            }
            _ => Some(failure_text(decision).to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::components::dashboard::render_dashboard;
    use crate::console::fake_api::{FakeApi, Reply, sample_requests, sample_users};
    use crate::notifications::NotificationLog;
    use crate::session::MemorySessionStore;

    const OPERATOR: &str = "76561198000000000";

    async fn signed_in(
        api: &Arc<FakeApi>,
        policy: NotificationPolicy,
    ) -> (
        ModerationConsole<Arc<FakeApi>, MemorySessionStore, NotificationLog>,
        NotificationLog,
    ) {
        let notifications = NotificationLog::new();
        let console = ModerationConsole::new(
            Arc::clone(api),
            MemorySessionStore::new(),
            notifications.clone(),
            policy,
        );
        assert!(console.login(OPERATOR).await);
        (console, notifications)
    }

    #[tokio::test]
    async fn test_dashboard_scenario_approve_reloads_once() {
        let api = Arc::new(
            FakeApi::new()
                .with_requests(sample_requests())
                .with_users(sample_users()),
        );
        let (console, notifications) = signed_in(&api, NotificationPolicy::Parity).await;

        let snapshot = console.snapshot().await;
        assert_eq!(snapshot.pending_count(), 2);
        assert_eq!(snapshot.users.len(), 3);
        let screen = render_dashboard(&snapshot);
        assert!(screen.contains("Purchase requests [2]"));

        let outcome = console.approve(PurchaseRequestId::new(7)).await;

        assert_eq!(outcome, ModerationOutcome::Completed);
        assert_eq!(
            api.moderations(),
            vec![(PurchaseRequestId::new(7), ModerationDecision::Approve)]
        );
        // Initial load plus exactly one reload.
        assert_eq!(api.requests_calls(), 2);
        assert_eq!(api.users_calls(), 2);
        assert_eq!(
            notifications.snapshot(),
            vec![Notification::success("Privilege activated")]
        );
        assert!(api.operators_seen().iter().all(|op| op == OPERATOR));

        let snapshot = console.snapshot().await;
        assert_eq!(snapshot.pending_count(), 1);
        assert!(render_dashboard(&snapshot).contains("Purchase requests [1]"));
    }

    #[tokio::test]
    async fn test_reject_success() {
        let api = Arc::new(FakeApi::new().with_requests(sample_requests()));
        let (console, notifications) = signed_in(&api, NotificationPolicy::Parity).await;

        let outcome = console.reject(PurchaseRequestId::new(8)).await;

        assert!(outcome.is_completed());
        assert_eq!(
            api.moderations(),
            vec![(PurchaseRequestId::new(8), ModerationDecision::Reject)]
        );
        assert_eq!(
            notifications.drain(),
            vec![Notification::success("Request rejected")]
        );
        let remaining: Vec<i64> = console
            .snapshot()
            .await
            .requests
            .iter()
            .map(|r| r.id.into())
            .collect();
        assert_eq!(remaining, vec![7]);
    }

    #[tokio::test]
    async fn test_server_refusal_is_notified_without_reload() {
        let api = Arc::new(
            FakeApi::new()
                .with_requests(sample_requests())
                .with_moderation_reply(Reply::Api(
                    404,
                    Some("Request not found or already processed".to_string()),
                )),
        );
        let (console, notifications) = signed_in(&api, NotificationPolicy::Parity).await;

        let outcome = console.approve(PurchaseRequestId::new(99)).await;

        assert_eq!(outcome, ModerationOutcome::Failed);
        assert_eq!(
            notifications.snapshot(),
            vec![Notification::error(Some(
                "Request not found or already processed".to_string()
            ))]
        );
        assert_eq!(api.requests_calls(), 1);
        assert_eq!(api.users_calls(), 1);
        assert_eq!(console.snapshot().await.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_text() {
        let api = Arc::new(FakeApi::new().with_moderation_reply(Reply::Network));
        let (console, notifications) = signed_in(&api, NotificationPolicy::Parity).await;

        assert_eq!(
            console.approve(PurchaseRequestId::new(7)).await,
            ModerationOutcome::Failed
        );
        assert_eq!(
            console.reject(PurchaseRequestId::new(7)).await,
            ModerationOutcome::Failed
        );

        assert_eq!(
            notifications.snapshot(),
            vec![
                Notification::error(Some("Could not activate privilege".to_string())),
                Notification::error(Some("Could not reject request".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_without_text_depends_on_policy() {
        let api = Arc::new(FakeApi::new().with_moderation_reply(Reply::Api(500, None)));

        let (parity, parity_log) = signed_in(&api, NotificationPolicy::Parity).await;
        parity.approve(PurchaseRequestId::new(7)).await;
        assert_eq!(parity_log.snapshot(), vec![Notification::error(None)]);

        let (unified, unified_log) = signed_in(&api, NotificationPolicy::Unified).await;
        unified.reject(PurchaseRequestId::new(7)).await;
        assert_eq!(
            unified_log.snapshot(),
            vec![Notification::error(Some("Could not reject request".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_signed_out_moderation_sends_nothing() {
        let api = Arc::new(FakeApi::new());
        let notifications = NotificationLog::new();
        let console = ModerationConsole::new(
            Arc::clone(&api),
            MemorySessionStore::new(),
            notifications.clone(),
            NotificationPolicy::Parity,
        );

        assert_eq!(
            console.approve(PurchaseRequestId::new(7)).await,
            ModerationOutcome::NotAuthenticated
        );
        assert_eq!(api.moderation_calls(), 0);
        assert!(notifications.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_decision_while_in_flight_is_refused() {
        let api = Arc::new(
            FakeApi::new()
                .with_requests(sample_requests())
                .gate_moderation(),
        );
        let (console, notifications) = signed_in(&api, NotificationPolicy::Parity).await;
        let id = PurchaseRequestId::new(7);

        let (first, second) = tokio::join!(console.approve(id), async {
            api.wait_for_moderation_calls(1).await;
            assert!(console.in_flight.contains(id));
            let second = console.reject(id).await;
            api.release_moderation(1);
            second
        });

        assert_eq!(first, ModerationOutcome::Completed);
        assert_eq!(second, ModerationOutcome::AlreadyInFlight);
        assert_eq!(api.moderation_calls(), 1);
        assert_eq!(
            notifications.snapshot(),
            vec![Notification::success("Privilege activated")]
        );

        // Guard released once the first call settled.
        assert!(!console.in_flight.contains(id));
        api.release_moderation(1);
        assert_eq!(console.approve(id).await, ModerationOutcome::Completed);
        assert_eq!(api.moderation_calls(), 2);
    }

    #[tokio::test]
    async fn test_different_requests_may_be_moderated_concurrently() {
        let api = Arc::new(
            FakeApi::new()
                .with_requests(sample_requests())
                .gate_moderation(),
        );
        let (console, _) = signed_in(&api, NotificationPolicy::Parity).await;

        let (first, second, ()) = tokio::join!(
            console.approve(PurchaseRequestId::new(7)),
            console.reject(PurchaseRequestId::new(8)),
            async {
                api.wait_for_moderation_calls(2).await;
                api.release_moderation(2);
            }
        );

        assert!(first.is_completed());
        assert!(second.is_completed());
        assert_eq!(console.snapshot().await.pending_count(), 0);
    }
}
