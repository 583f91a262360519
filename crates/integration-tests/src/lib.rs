//! Integration tests for WINNER.TO.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p winner-integration-tests
//! ```
//!
//! Tests start a [`MockBackend`] on an ephemeral local port. It serves the
//! admin endpoints (`/requests`, `/users`, `/approve`, `/reject`), the purchase
//! endpoint (`/purchase`) and the auth lookup (`/user/{steam_id}`) with the
//! status codes and error bodies of the deployed backend, and records every
//! call it receives.
//!
//! # Test Categories
//!
//! - `admin_console` - console flows over real HTTP
//! - `storefront_client` - purchase submission and profile lookups

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use winner_admin::config::{DEFAULT_IDENTIFIER_HEADER, NotificationPolicy};
use winner_admin::models::{PurchaseRequest, RequestUser, UserSummary};
use winner_admin::{AdminConfig, Notification};
use winner_core::{
    DurationCategory, ModerationDecision, PrivilegeTier, PurchaseRequestId, PurchaseStatus,
    Timestamp, UserId,
};

/// Operator the scenario fixture treats as an admin.
pub const ADMIN_STEAM_ID: &str = "76561198000000000";

/// A call received by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    /// Value of the operator identifier header, if sent.
    pub identifier: Option<String>,
    /// Value of `X-Steam-Id`, if sent.
    pub steam_id: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

/// Canned answer that replaces the normal handling of a route.
#[derive(Debug, Clone)]
pub enum Override {
    /// JSON body with the given status.
    Json(u16, Value),
    /// Non-JSON body with the given status.
    Text(u16, String),
}

impl Override {
    /// `{"error": message}` with the given status.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::Json(status, json!({ "error": message }))
    }
}

impl IntoResponse for Override {
    fn into_response(self) -> Response {
        match self {
            Self::Json(status, body) => (status_code(status), Json(body)).into_response(),
            Self::Text(status, body) => (status_code(status), body).into_response(),
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Initial backend contents.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub admins: HashSet<String>,
    pub users: Vec<UserSummary>,
    pub requests: Vec<PurchaseRequest>,
    /// Header the admin endpoints read the operator identifier from.
    pub identifier_header: String,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            admins: HashSet::new(),
            users: Vec::new(),
            requests: Vec::new(),
            identifier_header: DEFAULT_IDENTIFIER_HEADER.to_string(),
        }
    }
}

fn timestamp(raw: &str) -> Timestamp {
    Timestamp::parse(raw).unwrap_or_else(|_| Timestamp::new(chrono::NaiveDateTime::default()))
}

fn user(id: i64, steam_id: &str, steam_name: &str, created_at: &str) -> UserSummary {
    UserSummary {
        id: UserId::new(id),
        steam_id: steam_id.to_string(),
        steam_name: steam_name.to_string(),
        steam_avatar: None,
        created_at: timestamp(created_at),
        privilege_count: 0,
    }
}

fn request(
    id: i64,
    owner: &UserSummary,
    tier: PrivilegeTier,
    duration: DurationCategory,
    proof: &str,
    created_at: &str,
) -> PurchaseRequest {
    PurchaseRequest {
        id: PurchaseRequestId::new(id),
        privilege_type: tier.to_string(),
        duration_type: duration.to_string(),
        price: tier.price(duration).map(|p| p.amount).unwrap_or_default(),
        payment_proof: Some(proof.to_string()),
        status: Some(PurchaseStatus::Pending),
        created_at: timestamp(created_at),
        user: RequestUser {
            id: Some(owner.id),
            steam_id: owner.steam_id.clone(),
            steam_name: owner.steam_name.clone(),
            steam_avatar: owner.steam_avatar.clone(),
        },
    }
}

impl Fixture {
    /// One admin, three players, two pending requests (ids 7 and 8).
    #[must_use]
    pub fn scenario() -> Self {
        let admin = user(1, ADMIN_STEAM_ID, "operator", "2024-12-01T12:00:00");
        let player = user(12, "76561198000000001", "bhop_enjoyer", "2025-01-10T18:00:00");
        let surfer = user(13, "76561198000000002", "surfer", "2025-02-01T08:15:00");

        let requests = vec![
            request(
                7,
                &player,
                PrivilegeTier::Nice,
                DurationCategory::OneMonth,
                "tg:@bhop_enjoyer receipt 1",
                "2025-03-01T14:05:09.123456",
            ),
            request(
                8,
                &surfer,
                PrivilegeTier::Low,
                DurationCategory::TwoWeeks,
                "card *4412",
                "2025-03-02T09:30:00",
            ),
        ];

        Self {
            admins: HashSet::from([ADMIN_STEAM_ID.to_string()]),
            users: vec![admin, player, surfer],
            requests,
            identifier_header: DEFAULT_IDENTIFIER_HEADER.to_string(),
        }
    }

    #[must_use]
    pub fn with_identifier_header(mut self, name: &str) -> Self {
        self.identifier_header = name.to_string();
        self
    }
}

#[derive(Debug)]
struct StoredRequest {
    request: PurchaseRequest,
    status: PurchaseStatus,
}

#[derive(Debug)]
struct BackendState {
    admins: HashSet<String>,
    users: Vec<UserSummary>,
    requests: Vec<StoredRequest>,
    privileges: HashMap<String, Vec<Value>>,
    overrides: HashMap<String, Override>,
    calls: Vec<RecordedCall>,
    next_request_id: i64,
}

#[derive(Debug)]
struct Shared {
    identifier_header: String,
    state: Mutex<BackendState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn header(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    }

    /// Record the call and return the override for `route`, if any.
    fn record(
        &self,
        method: Method,
        path: &str,
        headers: &HeaderMap,
        body: Option<Value>,
    ) -> Option<Override> {
        let call = RecordedCall {
            method,
            path: path.to_string(),
            identifier: Self::header(headers, &self.identifier_header),
            steam_id: Self::header(headers, "x-steam-id"),
            content_type: Self::header(headers, "content-type"),
            body,
        };
        let mut state = self.lock();
        state.calls.push(call);
        let route = path.split('/').nth(1).unwrap_or_default();
        state.overrides.get(route).cloned()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Override> {
        let Some(identifier) = Self::header(headers, &self.identifier_header) else {
            return Err(Override::error(401, "Admin authentication required"));
        };
        if self.lock().admins.contains(&identifier) {
            Ok(())
        } else {
            Err(Override::error(403, "Access denied. Admin privileges required."))
        }
    }
}

/// In-process stand-in for the admin, purchase and auth backends.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Serve `fixture` on an ephemeral local port.
    pub async fn start(fixture: Fixture) -> Self {
        let next_request_id = fixture
            .requests
            .iter()
            .map(|r| r.id.as_i64())
            .max()
            .unwrap_or(0)
            + 1;

        let shared = Arc::new(Shared {
            identifier_header: fixture.identifier_header.to_ascii_lowercase(),
            state: Mutex::new(BackendState {
                admins: fixture.admins,
                users: fixture.users,
                requests: fixture
                    .requests
                    .into_iter()
                    .map(|request| StoredRequest {
                        status: request.status.unwrap_or_default(),
                        request,
                    })
                    .collect(),
                privileges: HashMap::new(),
                overrides: HashMap::new(),
                calls: Vec::new(),
                next_request_id,
            }),
        });

        let app = Router::new()
            .route("/requests", get(list_requests))
            .route("/users", get(list_users))
            .route("/approve", post(approve))
            .route("/reject", post(reject))
            .route("/purchase", post(purchase))
            .route("/user/{steam_id}", get(profile))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            shared,
            server,
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Purchase endpoint URL.
    #[must_use]
    pub fn purchase_url(&self) -> String {
        format!("{}/purchase", self.url())
    }

    /// Answer every call to `route` (first path segment, e.g. `"requests"`)
    /// with `response` until cleared.
    pub fn set_override(&self, route: &str, response: Override) {
        self.shared
            .lock()
            .overrides
            .insert(route.to_string(), response);
    }

    pub fn clear_override(&self, route: &str) {
        self.shared.lock().overrides.remove(route);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.lock().calls.clone()
    }

    /// Number of calls received for `method` and `path`.
    #[must_use]
    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.shared
            .lock()
            .calls
            .iter()
            .filter(|c| c.method == *method && c.path == path)
            .count()
    }

    /// Ids of requests still pending, in listing order.
    #[must_use]
    pub fn pending_ids(&self) -> Vec<i64> {
        self.shared
            .lock()
            .requests
            .iter()
            .filter(|r| r.status == PurchaseStatus::Pending)
            .map(|r| r.request.id.as_i64())
            .collect()
    }

    #[must_use]
    pub fn status_of(&self, id: i64) -> Option<PurchaseStatus> {
        self.shared
            .lock()
            .requests
            .iter()
            .find(|r| r.request.id.as_i64() == id)
            .map(|r| r.status)
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn list_requests(State(shared): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    if let Some(response) = shared.record(Method::GET, "/requests", &headers, None) {
        return response.into_response();
    }
    if let Err(response) = shared.authorize(&headers) {
        return response.into_response();
    }

    let pending: Vec<PurchaseRequest> = shared
        .lock()
        .requests
        .iter()
        .filter(|r| r.status == PurchaseStatus::Pending)
        .map(|r| r.request.clone())
        .collect();
    Json(json!({ "requests": pending })).into_response()
}

async fn list_users(State(shared): State<Arc<Shared>>, headers: HeaderMap) -> Response {
    if let Some(response) = shared.record(Method::GET, "/users", &headers, None) {
        return response.into_response();
    }
    if let Err(response) = shared.authorize(&headers) {
        return response.into_response();
    }

    let users = shared.lock().users.clone();
    Json(json!({ "users": users })).into_response()
}

#[derive(Debug, Deserialize)]
struct ModerationPayload {
    request_id: Option<i64>,
}

async fn approve(State(shared): State<Arc<Shared>>, headers: HeaderMap, body: Bytes) -> Response {
    moderate(&shared, &headers, &body, ModerationDecision::Approve)
}

async fn reject(State(shared): State<Arc<Shared>>, headers: HeaderMap, body: Bytes) -> Response {
    moderate(&shared, &headers, &body, ModerationDecision::Reject)
}

fn moderate(
    shared: &Shared,
    headers: &HeaderMap,
    body: &Bytes,
    decision: ModerationDecision,
) -> Response {
    let path = match decision {
        ModerationDecision::Approve => "/approve",
        ModerationDecision::Reject => "/reject",
    };
    let json_body = serde_json::from_slice::<Value>(body).ok();
    if let Some(response) = shared.record(Method::POST, path, headers, json_body.clone()) {
        return response.into_response();
    }
    if let Err(response) = shared.authorize(headers) {
        return response.into_response();
    }

    let Some(request_id) = json_body
        .and_then(|v| serde_json::from_value::<ModerationPayload>(v).ok())
        .and_then(|p| p.request_id)
    else {
        return Override::error(400, "request_id is required").into_response();
    };

    let mut state = shared.lock();
    let Some(stored) = state
        .requests
        .iter_mut()
        .find(|r| r.request.id.as_i64() == request_id)
    else {
        return Override::error(404, "Request not found or already processed").into_response();
    };
    let Ok(next) = stored.status.apply(decision) else {
        return Override::error(404, "Request not found or already processed").into_response();
    };
    stored.status = next;

    if decision == ModerationDecision::Approve {
        let request = stored.request.clone();
        grant_privilege(&mut state, &request);
        return Json(json!({ "success": true, "message": "Privilege activated" }))
            .into_response();
    }

    Json(json!({ "success": true, "message": "Request rejected" })).into_response()
}

fn grant_privilege(state: &mut BackendState, request: &PurchaseRequest) {
    let now = chrono::Utc::now().naive_utc();
    let expires_at = match request.duration() {
        Some(DurationCategory::TwoWeeks) => Some(now + chrono::Duration::days(14)),
        Some(DurationCategory::OneMonth) => Some(now + chrono::Duration::days(30)),
        Some(DurationCategory::Forever) | None => None,
    };

    state
        .privileges
        .entry(request.user.steam_id.clone())
        .or_default()
        .push(json!({
            "type": request.privilege_type,
            "expires_at": expires_at.map(|t| Timestamp::new(t).to_string()),
            "activated_at": Timestamp::new(now).to_string(),
        }));

    if let Some(user) = state
        .users
        .iter_mut()
        .find(|u| u.steam_id == request.user.steam_id)
    {
        user.privilege_count += 1;
    }
}

#[derive(Debug, Deserialize)]
struct PurchasePayload {
    privilege_type: Option<String>,
    duration_type: Option<String>,
    #[serde(default)]
    payment_proof: Option<String>,
}

async fn purchase(State(shared): State<Arc<Shared>>, headers: HeaderMap, body: Bytes) -> Response {
    let json_body = serde_json::from_slice::<Value>(&body).ok();
    if let Some(response) = shared.record(Method::POST, "/purchase", &headers, json_body.clone()) {
        return response.into_response();
    }

    let Some(steam_id) = Shared::header(&headers, "x-steam-id") else {
        return Override::error(401, "Steam authentication required").into_response();
    };

    let payload = json_body.and_then(|v| serde_json::from_value::<PurchasePayload>(v).ok());
    let Some(PurchasePayload {
        privilege_type: Some(privilege_type),
        duration_type: Some(duration_type),
        payment_proof,
    }) = payload
    else {
        return Override::error(400, "privilege_type and duration_type are required")
            .into_response();
    };

    let Ok(tier) = privilege_type.parse::<PrivilegeTier>() else {
        return Override::error(400, "Invalid privilege_type").into_response();
    };
    let Ok(duration) = duration_type.parse::<DurationCategory>() else {
        return Override::error(400, "Invalid duration_type").into_response();
    };
    let Some(price) = tier.price(duration) else {
        return Override::error(400, "Invalid price combination").into_response();
    };

    let mut state = shared.lock();
    let Some(owner) = state.users.iter().find(|u| u.steam_id == steam_id).cloned() else {
        return Override::error(404, "User not found. Please login first.").into_response();
    };

    let id = state.next_request_id;
    state.next_request_id += 1;
    let created_at = Timestamp::new(chrono::Utc::now().naive_utc());

    state.requests.push(StoredRequest {
        request: PurchaseRequest {
            id: PurchaseRequestId::new(id),
            privilege_type: tier.to_string(),
            duration_type: duration.to_string(),
            price: price.amount,
            payment_proof: Some(payment_proof.unwrap_or_default()),
            status: Some(PurchaseStatus::Pending),
            created_at,
            user: RequestUser {
                id: Some(owner.id),
                steam_id: owner.steam_id,
                steam_name: owner.steam_name,
                steam_avatar: owner.steam_avatar,
            },
        },
        status: PurchaseStatus::Pending,
    });

    Json(json!({
        "success": true,
        "request_id": id,
        "created_at": created_at.to_string(),
        "message": "Purchase request created. Admin will review it soon."
    }))
    .into_response()
}

async fn profile(
    State(shared): State<Arc<Shared>>,
    Path(steam_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/user/{steam_id}");
    if let Some(response) = shared.record(Method::GET, &path, &headers, None) {
        return response.into_response();
    }

    let state = shared.lock();
    let Some(user) = state.users.iter().find(|u| u.steam_id == steam_id) else {
        return Override::error(404, "User not found").into_response();
    };

    Json(json!({
        "user": {
            "id": user.id,
            "steam_id": user.steam_id,
            "steam_name": user.steam_name,
            "steam_avatar": user.steam_avatar.clone().unwrap_or_default(),
            "is_admin": state.admins.contains(&user.steam_id),
        },
        "privileges": state.privileges.get(&steam_id).cloned().unwrap_or_default(),
    }))
    .into_response()
}

/// Admin console configuration pointing at `backend`, with a fresh session
/// file under the system temp dir.
#[must_use]
pub fn admin_config(backend: &MockBackend, policy: NotificationPolicy) -> AdminConfig {
    AdminConfig {
        api_url: backend.url(),
        identifier_header: DEFAULT_IDENTIFIER_HEADER.to_string(),
        session_file: temp_session_file(),
        notification_policy: policy,
        request_timeout: Some(std::time::Duration::from_secs(10)),
    }
}

/// A session file path that does not exist yet.
#[must_use]
pub fn temp_session_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("winner-it-{}", uuid::Uuid::new_v4()))
        .join("admin-session.json")
}

/// Descriptions of recorded notifications, in order.
#[must_use]
pub fn descriptions(notifications: &[Notification]) -> Vec<Option<String>> {
    notifications.iter().map(|n| n.description.clone()).collect()
}
