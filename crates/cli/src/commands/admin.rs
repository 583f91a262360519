//! Moderation console commands.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (stores the identifier locally, then shows the dashboard)
//! winner admin login 76561198000000000
//!
//! # Review and decide
//! winner admin requests --detail
//! winner admin approve 7
//! winner admin reject 8
//!
//! # Forget the stored identifier
//! winner admin logout
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_API_URL` - Base URL of the admin backend
//! - `ADMIN_IDENTIFIER_HEADER`, `ADMIN_SESSION_FILE`,
//!   `ADMIN_NOTIFICATION_POLICY`, `ADMIN_REQUEST_TIMEOUT_SECS` - see
//!   [`winner_admin::config`]

use thiserror::Error;
use winner_admin::components::dashboard::{
    render_dashboard, render_request_detail, render_requests, render_users, requests_tab_label,
};
use winner_admin::{
    AdminApiError, AdminClient, AdminConfig, ConfigError, FileSessionStore, ModerationConsole,
    ModerationOutcome,
};
use winner_core::PurchaseRequestId;

use crate::output::{TerminalNotifier, print};

type Console = ModerationConsole<AdminClient, FileSessionStore, TerminalNotifier>;

/// Errors that can occur during console commands.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Client(#[from] AdminApiError),

    /// No stored session.
    #[error("Not signed in. Run `winner admin login <identifier>` first")]
    NotSignedIn,

    /// The backend refused or could not be reached.
    #[error("Could not {action} request {id}")]
    ModerationFailed {
        action: &'static str,
        id: PurchaseRequestId,
    },

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

fn console() -> Result<Console, AdminError> {
    let config = AdminConfig::from_env()?;
    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        policy = ?config.notification_policy,
        "Console configured"
    );

    let client = AdminClient::new(&config)?;
    let store = FileSessionStore::new(config.session_file.clone());
    Ok(ModerationConsole::new(
        client,
        store,
        TerminalNotifier,
        config.notification_policy,
    ))
}

/// Restore the stored session (which loads both lists) or fail.
async fn signed_in_console() -> Result<Console, AdminError> {
    let console = console()?;
    if !console.restore_session().await {
        return Err(AdminError::NotSignedIn);
    }
    Ok(console)
}

/// Sign in and show the dashboard.
pub async fn login(identifier: &str) -> Result<(), AdminError> {
    let console = console()?;

    if !console.login(identifier).await {
        tracing::warn!("Identifier is blank, nothing to do");
        return Ok(());
    }

    print(&render_dashboard(&console.snapshot().await))?;
    Ok(())
}

/// Forget the stored identifier.
pub async fn logout() -> Result<(), AdminError> {
    let console = console()?;
    console.logout().await;
    print("Signed out")?;
    Ok(())
}

/// Show whether a session is stored and what it sees.
pub async fn status() -> Result<(), AdminError> {
    let console = console()?;

    if !console.restore_session().await {
        print("Not signed in")?;
        return Ok(());
    }

    let snapshot = console.snapshot().await;
    print(&format!(
        "Signed in. {} pending request(s), {} user(s)",
        snapshot.pending_count(),
        snapshot.users.len()
    ))?;
    Ok(())
}

/// Show both tabs.
pub async fn dashboard() -> Result<(), AdminError> {
    let console = signed_in_console().await?;
    print(&render_dashboard(&console.snapshot().await))?;
    Ok(())
}

/// List pending requests, optionally with every field.
pub async fn requests(detail: bool) -> Result<(), AdminError> {
    let console = signed_in_console().await?;
    let snapshot = console.snapshot().await;

    print(&requests_tab_label(snapshot.pending_count()))?;
    if detail && !snapshot.requests.is_empty() {
        for request in &snapshot.requests {
            print(&render_request_detail(request))?;
        }
    } else {
        print(&render_requests(&snapshot.requests, snapshot.loading))?;
    }
    Ok(())
}

/// List registered players.
pub async fn users() -> Result<(), AdminError> {
    let console = signed_in_console().await?;
    let snapshot = console.snapshot().await;
    print(&render_users(&snapshot.users, snapshot.loading))?;
    Ok(())
}

/// Approve a request.
pub async fn approve(id: PurchaseRequestId) -> Result<(), AdminError> {
    let console = signed_in_console().await?;
    let outcome = console.approve(id).await;
    finish(&console, outcome, "approve", id).await
}

/// Reject a request.
pub async fn reject(id: PurchaseRequestId) -> Result<(), AdminError> {
    let console = signed_in_console().await?;
    let outcome = console.reject(id).await;
    finish(&console, outcome, "reject", id).await
}

async fn finish(
    console: &Console,
    outcome: ModerationOutcome,
    action: &'static str,
    id: PurchaseRequestId,
) -> Result<(), AdminError> {
    match outcome {
        ModerationOutcome::Completed => {
            let snapshot = console.snapshot().await;
            print(&requests_tab_label(snapshot.pending_count()))?;
            print(&render_requests(&snapshot.requests, snapshot.loading))?;
            Ok(())
        }
        ModerationOutcome::NotAuthenticated => Err(AdminError::NotSignedIn),
        ModerationOutcome::Failed | ModerationOutcome::AlreadyInFlight => {
            Err(AdminError::ModerationFailed { action, id })
        }
    }
}
