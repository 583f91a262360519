//! Scriptable [`AdminApi`] for console tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use winner_core::{ModerationDecision, OperatorId, PurchaseRequestId};

use crate::client::AdminApi;
use crate::error::AdminApiError;
use crate::models::{PurchaseRequest, UserSummary};

/// Scripted answer for one endpoint.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Api(u16, Option<String>),
    Network,
    Malformed,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, AdminApiError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Api(status, message) => Err(AdminApiError::Api {
                status: *status,
                message: message.clone(),
            }),
            Self::Network => Err(network_error()),
            Self::Malformed => Err(AdminApiError::MalformedResponse {
                status: 200,
                detail: "expected value at line 1 column 1".to_string(),
            }),
        }
    }
}

/// A real `reqwest::Error`, produced without touching the network.
pub(crate) fn network_error() -> AdminApiError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    AdminApiError::Network(err)
}

#[derive(Debug, Default)]
struct Counter {
    started: AtomicUsize,
    settled: AtomicUsize,
}

impl Counter {
    fn start(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn settle(&self) {
        self.settled.fetch_add(1, Ordering::SeqCst);
    }

    fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn settled(&self) -> usize {
        self.settled.load(Ordering::SeqCst)
    }
}

async fn pass(gate: Option<&Semaphore>) {
    if let Some(gate) = gate {
        gate.acquire().await.unwrap().forget();
    }
}

async fn wait_until(condition: impl Fn() -> bool) {
    while !condition() {
        tokio::task::yield_now().await;
    }
}

/// In-memory backend double.
///
/// A successful moderation removes the request from the scripted list, the
/// way the real backend stops listing processed requests.
#[derive(Debug)]
pub(crate) struct FakeApi {
    requests: Mutex<Reply<Vec<PurchaseRequest>>>,
    users: Mutex<Reply<Vec<UserSummary>>>,
    moderation: Mutex<Reply<()>>,
    requests_gate: Option<Semaphore>,
    users_gate: Option<Semaphore>,
    moderation_gate: Option<Semaphore>,
    requests_calls: Counter,
    users_calls: Counter,
    moderation_calls: Counter,
    moderations: Mutex<Vec<(PurchaseRequestId, ModerationDecision)>>,
    operators: Mutex<Vec<String>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            requests: Mutex::new(Reply::Ok(Vec::new())),
            users: Mutex::new(Reply::Ok(Vec::new())),
            moderation: Mutex::new(Reply::Ok(())),
            requests_gate: None,
            users_gate: None,
            moderation_gate: None,
            requests_calls: Counter::default(),
            users_calls: Counter::default(),
            moderation_calls: Counter::default(),
            moderations: Mutex::new(Vec::new()),
            operators: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_requests(self, requests: Vec<PurchaseRequest>) -> Self {
        self.with_requests_reply(Reply::Ok(requests))
    }

    pub(crate) fn with_requests_reply(self, reply: Reply<Vec<PurchaseRequest>>) -> Self {
        self.set_requests(reply);
        self
    }

    pub(crate) fn with_users(self, users: Vec<UserSummary>) -> Self {
        self.with_users_reply(Reply::Ok(users))
    }

    pub(crate) fn with_users_reply(self, reply: Reply<Vec<UserSummary>>) -> Self {
        self.set_users(reply);
        self
    }

    pub(crate) fn with_moderation_reply(self, reply: Reply<()>) -> Self {
        *self.moderation.lock().unwrap() = reply;
        self
    }

    /// Hold every requests fetch until [`release_requests`](Self::release_requests).
    pub(crate) fn gate_requests(mut self) -> Self {
        self.requests_gate = Some(Semaphore::new(0));
        self
    }

    pub(crate) fn gate_users(mut self) -> Self {
        self.users_gate = Some(Semaphore::new(0));
        self
    }

    pub(crate) fn gate_moderation(mut self) -> Self {
        self.moderation_gate = Some(Semaphore::new(0));
        self
    }

    pub(crate) fn set_requests(&self, reply: Reply<Vec<PurchaseRequest>>) {
        *self.requests.lock().unwrap() = reply;
    }

    pub(crate) fn set_users(&self, reply: Reply<Vec<UserSummary>>) {
        *self.users.lock().unwrap() = reply;
    }

    pub(crate) fn release_requests(&self, n: usize) {
        if let Some(gate) = &self.requests_gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn release_users(&self, n: usize) {
        if let Some(gate) = &self.users_gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn release_moderation(&self, n: usize) {
        if let Some(gate) = &self.moderation_gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn requests_calls(&self) -> usize {
        self.requests_calls.started()
    }

    pub(crate) fn users_calls(&self) -> usize {
        self.users_calls.started()
    }

    pub(crate) fn moderation_calls(&self) -> usize {
        self.moderation_calls.started()
    }

    pub(crate) fn moderations(&self) -> Vec<(PurchaseRequestId, ModerationDecision)> {
        self.moderations.lock().unwrap().clone()
    }

    /// Identifier header values received, in call order.
    pub(crate) fn operators_seen(&self) -> Vec<String> {
        self.operators.lock().unwrap().clone()
    }

    pub(crate) async fn wait_for_requests_calls(&self, n: usize) {
        wait_until(|| self.requests_calls.started() >= n).await;
    }

    pub(crate) async fn wait_for_users_calls(&self, n: usize) {
        wait_until(|| self.users_calls.started() >= n).await;
    }

    pub(crate) async fn wait_for_requests_settled(&self, n: usize) {
        wait_until(|| self.requests_calls.settled() >= n).await;
    }

    pub(crate) async fn wait_for_moderation_calls(&self, n: usize) {
        wait_until(|| self.moderation_calls.started() >= n).await;
    }

    fn record_operator(&self, operator: &OperatorId) {
        self.operators
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operator.as_str().to_string());
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn pending_requests(
        &self,
        operator: &OperatorId,
    ) -> Result<Vec<PurchaseRequest>, AdminApiError> {
        self.record_operator(operator);
        self.requests_calls.start();
        pass(self.requests_gate.as_ref()).await;
        let result = self.requests.lock().unwrap().to_result();
        self.requests_calls.settle();
        result
    }

    async fn users(&self, operator: &OperatorId) -> Result<Vec<UserSummary>, AdminApiError> {
        self.record_operator(operator);
        self.users_calls.start();
        pass(self.users_gate.as_ref()).await;
        let result = self.users.lock().unwrap().to_result();
        self.users_calls.settle();
        result
    }

    async fn moderate(
        &self,
        operator: &OperatorId,
        request_id: PurchaseRequestId,
        decision: ModerationDecision,
    ) -> Result<(), AdminApiError> {
        self.record_operator(operator);
        self.moderation_calls.start();
        self.moderations.lock().unwrap().push((request_id, decision));
        pass(self.moderation_gate.as_ref()).await;

        let result = self.moderation.lock().unwrap().to_result();
        if result.is_ok() {
            if let Reply::Ok(requests) = &mut *self.requests.lock().unwrap() {
                requests.retain(|r| r.id != request_id);
            }
        }
        self.moderation_calls.settle();
        result
    }
}

pub(crate) fn sample_requests() -> Vec<PurchaseRequest> {
    serde_json::from_value(serde_json::json!([
        {
            "id": 7,
            "privilege_type": "Nice",
            "duration_type": "1month",
            "price": 100,
            "payment_proof": "tg:@bhop_enjoyer receipt 1",
            "status": "pending",
            "created_at": "2025-03-01T14:05:09.123456",
            "user": {
                "id": 12,
                "steam_id": "76561198000000001",
                "steam_name": "bhop_enjoyer",
                "steam_avatar": "https://avatars.example/12.jpg"
            }
        },
        {
            "id": 8,
            "privilege_type": "Low",
            "duration_type": "2weeks",
            "price": 20,
            "payment_proof": "card *4412",
            "created_at": "2025-03-02T09:30:00+03:00",
            "user": {
                "id": 13,
                "steam_id": "76561198000000002",
                "steam_name": "surfer",
                "steam_avatar": null
            }
        }
    ]))
    .unwrap()
}

pub(crate) fn sample_users() -> Vec<UserSummary> {
    serde_json::from_value(serde_json::json!([
        {
            "id": 12,
            "steam_id": "76561198000000001",
            "steam_name": "bhop_enjoyer",
            "steam_avatar": "https://avatars.example/12.jpg",
            "created_at": "2025-01-10T18:00:00",
            "privilege_count": 1
        },
        {
            "id": 13,
            "steam_id": "76561198000000002",
            "steam_name": "surfer",
            "steam_avatar": null,
            "created_at": "2025-02-01T08:15:00",
            "privilege_count": 0
        },
        {
            "id": 14,
            "steam_id": "76561198000000003",
            "steam_name": "awper",
            "created_at": "2025-02-20T21:45:30"
        }
    ]))
    .unwrap()
}
