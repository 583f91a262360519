//! WINNER.TO CLI - moderation console and storefront tools.
//!
//! # Usage
//!
//! ```bash
//! # Moderation console
//! winner admin login 76561198000000000
//! winner admin dashboard
//! winner admin approve 7
//! winner admin logout
//!
//! # Storefront
//! winner store catalog
//! winner store login-url --origin https://winner.to
//! winner store purchase --steam-id 76561198000000001 --tier Low --duration 2weeks --proof "sbp 0412"
//! winner store profile 76561198000000001
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log filter (default: `winner_cli=info,winner_admin=info,winner_storefront=info`)
//! - `WINNER_LOG_FORMAT` - `json` for structured logs, text otherwise
//! - `SENTRY_DSN` - Sentry error tracking DSN (optional)
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (optional)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use winner_core::{DurationCategory, PrivilegeTier, PurchaseRequestId};

mod commands;
mod output;

const DEFAULT_LOG_FILTER: &str = "winner_cli=info,winner_admin=info,winner_storefront=info";

#[derive(Parser)]
#[command(name = "winner")]
#[command(author, version, about = "WINNER.TO privilege store tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate purchase requests
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Player-facing storefront tools
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Sign in with an operator identifier (Steam ID)
    Login {
        /// Operator identifier, stored verbatim
        identifier: String,
    },
    /// Forget the stored identifier
    Logout,
    /// Show whether a session is stored
    Status,
    /// Show pending requests and users
    Dashboard,
    /// List pending purchase requests
    Requests {
        /// Show every field, payment proof included
        #[arg(short, long)]
        detail: bool,
    },
    /// List registered players
    Users,
    /// Approve a pending request and activate the privilege
    Approve {
        /// Request ID
        id: PurchaseRequestId,
    },
    /// Reject a pending request
    Reject {
        /// Request ID
        id: PurchaseRequestId,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Show privilege tiers, prices and features
    Catalog,
    /// Print the Steam sign-in URL
    LoginUrl {
        /// Site origin (default: `SITE_ORIGIN`)
        #[arg(short, long)]
        origin: Option<String>,
    },
    /// Submit a purchase request
    Purchase {
        /// Player Steam ID
        #[arg(short, long)]
        steam_id: String,

        /// Tier (`Low`, `Nice`, `Escape`)
        #[arg(short, long)]
        tier: PrivilegeTier,

        /// Duration (`2weeks`, `1month`, `forever`)
        #[arg(short, long)]
        duration: DurationCategory,

        /// Payment reference for the operator
        #[arg(short, long)]
        proof: String,
    },
    /// Show a player's active privileges
    Profile {
        /// Player Steam ID
        steam_id: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|d| !d.is_empty())?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            send_default_pii: false,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // Logs go to stderr so command output on stdout stays clean
    let is_json = std::env::var("WINNER_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Login { identifier } => commands::admin::login(&identifier).await?,
            AdminAction::Logout => commands::admin::logout().await?,
            AdminAction::Status => commands::admin::status().await?,
            AdminAction::Dashboard => commands::admin::dashboard().await?,
            AdminAction::Requests { detail } => commands::admin::requests(detail).await?,
            AdminAction::Users => commands::admin::users().await?,
            AdminAction::Approve { id } => commands::admin::approve(id).await?,
            AdminAction::Reject { id } => commands::admin::reject(id).await?,
        },
        Commands::Store { action } => match action {
            StoreAction::Catalog => commands::store::show_catalog()?,
            StoreAction::LoginUrl { origin } => commands::store::login_url(origin.as_deref())?,
            StoreAction::Purchase {
                steam_id,
                tier,
                duration,
                proof,
            } => commands::store::purchase(&steam_id, tier, duration, &proof).await?,
            StoreAction::Profile { steam_id } => commands::store::profile(&steam_id).await?,
        },
    }
    Ok(())
}
