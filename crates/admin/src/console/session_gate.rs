//! Sign-in state of the console.
//!
//! Presence of a stored identifier is the whole check. The backend decides
//! on every call whether the identifier belongs to an admin.

use tracing::{debug, info, instrument, warn};
use winner_core::OperatorId;

use super::ModerationConsole;
use crate::client::AdminApi;
use crate::notifications::Notifier;
use crate::session::SessionStore;

impl<A, S, N> ModerationConsole<A, S, N>
where
    A: AdminApi,
    S: SessionStore,
    N: Notifier,
{
    /// Pick up a persisted session, if any, and load both lists.
    ///
    /// Returns whether the console is now authenticated.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> bool {
        let stored = match self.store.get() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read stored session");
                None
            }
        };

        let Some(operator) = stored else {
            debug!("No stored session");
            return false;
        };

        self.begin_session(operator).await;
        info!("Session restored");
        self.load().await;
        true
    }

    /// Sign in with an operator identifier.
    ///
    /// Blank input is ignored: nothing is stored, loaded or notified.
    /// Anything else is stored verbatim and one load follows. Returns whether
    /// the input was accepted.
    #[instrument(skip_all)]
    pub async fn login(&self, identifier: &str) -> bool {
        let Ok(operator) = OperatorId::parse(identifier) else {
            debug!("Ignoring blank operator identifier");
            return false;
        };

        if let Err(e) = self.store.set(&operator) {
            warn!(error = %e, "Failed to persist session");
        }

        self.begin_session(operator).await;
        info!("Operator signed in");
        self.load().await;
        true
    }

    /// Sign out: forget the identifier and clear both lists. No server call.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }

        let mut state = self.state.write().await;
        state.session = None;
        state.generation = state.generation.wrapping_add(1);
        state.requests.clear();
        state.users.clear();
        state.loads_in_flight = 0;
        drop(state);

        info!("Operator signed out");
    }

    async fn begin_session(&self, operator: OperatorId) {
        let mut state = self.state.write().await;
        state.session = Some(operator);
        state.generation = state.generation.wrapping_add(1);
        // Loads of the previous session no longer decrement the counter
        state.loads_in_flight = 0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::NotificationPolicy;
    use crate::console::fake_api::{FakeApi, sample_requests, sample_users};
    use crate::notifications::NotificationLog;
    use crate::session::MemorySessionStore;

    type TestConsole =
        ModerationConsole<Arc<FakeApi>, Arc<MemorySessionStore>, NotificationLog>;

    fn console(api: &Arc<FakeApi>, store: &Arc<MemorySessionStore>) -> TestConsole {
        ModerationConsole::new(
            Arc::clone(api),
            Arc::clone(store),
            NotificationLog::new(),
            NotificationPolicy::Parity,
        )
    }

    #[tokio::test]
    async fn test_restore_without_session_stays_signed_out() {
        let api = Arc::new(FakeApi::new());
        let store = Arc::new(MemorySessionStore::new());
        let console = console(&api, &store);

        assert!(!console.restore_session().await);
        assert!(!console.is_authenticated().await);
        assert_eq!(api.requests_calls(), 0);
        assert_eq!(api.users_calls(), 0);
    }

    #[tokio::test]
    async fn test_restore_with_session_loads_once() {
        let api = Arc::new(
            FakeApi::new()
                .with_requests(sample_requests())
                .with_users(sample_users()),
        );
        let operator = OperatorId::parse("76561198000000000").unwrap();
        let store = Arc::new(MemorySessionStore::with_operator(operator.clone()));
        let console = console(&api, &store);

        assert!(console.restore_session().await);
        assert_eq!(console.operator().await, Some(operator));
        assert_eq!(api.requests_calls(), 1);
        assert_eq!(api.users_calls(), 1);
        assert_eq!(console.snapshot().await.pending_count(), 2);
        // Restoring does not rewrite the store.
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_login_is_ignored() {
        let api = Arc::new(FakeApi::new());
        let store = Arc::new(MemorySessionStore::new());
        let notifications = NotificationLog::new();
        let console = ModerationConsole::new(
            Arc::clone(&api),
            Arc::clone(&store),
            notifications.clone(),
            NotificationPolicy::Parity,
        );

        for input in ["", "   ", "\t\n"] {
            assert!(!console.login(input).await);
        }

        assert!(!console.is_authenticated().await);
        assert_eq!(store.write_count(), 0);
        assert_eq!(api.requests_calls(), 0);
        assert_eq!(api.users_calls(), 0);
        assert!(notifications.is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_verbatim_and_loads() {
        let api = Arc::new(FakeApi::new());
        let store = Arc::new(MemorySessionStore::new());
        let console = console(&api, &store);

        assert!(console.login("not-even-a-steam-id").await);

        assert!(console.is_authenticated().await);
        assert_eq!(
            store.get().unwrap().map(OperatorId::into_inner).as_deref(),
            Some("not-even-a-steam-id")
        );
        assert_eq!(api.requests_calls(), 1);
        assert_eq!(api.users_calls(), 1);
        assert_eq!(api.operators_seen(), vec!["not-even-a-steam-id"; 2]);
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_read_models() {
        let api = Arc::new(
            FakeApi::new()
                .with_requests(sample_requests())
                .with_users(sample_users()),
        );
        let store = Arc::new(MemorySessionStore::new());
        let console = console(&api, &store);

        console.login("76561198000000000").await;
        assert_eq!(console.snapshot().await.users.len(), 3);

        console.logout().await;

        let snapshot = console.snapshot().await;
        assert!(!snapshot.authenticated);
        assert!(!snapshot.loading);
        assert!(snapshot.requests.is_empty());
        assert!(snapshot.users.is_empty());
        assert!(store.get().unwrap().is_none());
        // Logout never talks to the backend.
        assert_eq!(api.requests_calls(), 1);
        assert_eq!(api.users_calls(), 1);
    }
}
