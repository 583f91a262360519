//! HTTP client for the admin backend.
//!
//! # API Reference
//!
//! All calls carry the operator identifier in a configurable header
//! (`X-Admin-Steam-Id` by default). The backend alone decides whether the
//! identifier belongs to an admin.
//!
//! | Call | Method | Body | Success |
//! |---|---|---|---|
//! | `/requests` | GET | - | `{ "requests": [...] }` |
//! | `/users` | GET | - | `{ "users": [...] }` |
//! | `/approve` | POST | `{ "request_id": n }` | any 2xx |
//! | `/reject` | POST | `{ "request_id": n }` | any 2xx |
//!
//! Errors come back as `{ "error": "..." }` with a non-2xx status.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use winner_core::{ModerationDecision, OperatorId, PurchaseRequestId};

use crate::config::AdminConfig;
use crate::error::AdminApiError;
use crate::models::wire::{ErrorEnvelope, ModerationBody, RequestsEnvelope, UsersEnvelope};
use crate::models::{PurchaseRequest, UserSummary};

/// Operations the console needs from the admin backend.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// List pending purchase requests, in the order the backend returns them.
    async fn pending_requests(
        &self,
        operator: &OperatorId,
    ) -> Result<Vec<PurchaseRequest>, AdminApiError>;

    /// List registered players.
    async fn users(&self, operator: &OperatorId) -> Result<Vec<UserSummary>, AdminApiError>;

    /// Approve or reject a pending request.
    async fn moderate(
        &self,
        operator: &OperatorId,
        request_id: PurchaseRequestId,
        decision: ModerationDecision,
    ) -> Result<(), AdminApiError>;
}

#[async_trait]
impl<T: AdminApi + ?Sized> AdminApi for Arc<T> {
    async fn pending_requests(
        &self,
        operator: &OperatorId,
    ) -> Result<Vec<PurchaseRequest>, AdminApiError> {
        (**self).pending_requests(operator).await
    }

    async fn users(&self, operator: &OperatorId) -> Result<Vec<UserSummary>, AdminApiError> {
        (**self).users(operator).await
    }

    async fn moderate(
        &self,
        operator: &OperatorId,
        request_id: PurchaseRequestId,
        decision: ModerationDecision,
    ) -> Result<(), AdminApiError> {
        (**self).moderate(operator, request_id, decision).await
    }
}

/// `reqwest`-backed admin backend client.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    identifier_header: HeaderName,
}

impl AdminClient {
    /// Create a client from console configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the configured
    /// header name is invalid.
    pub fn new(config: &AdminConfig) -> Result<Self, AdminApiError> {
        let identifier_header = HeaderName::from_bytes(config.identifier_header.as_bytes())
            .map_err(|_| AdminApiError::InvalidIdentifier)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
                identifier_header,
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn identifier_value(operator: &OperatorId) -> Result<HeaderValue, AdminApiError> {
        let mut value = HeaderValue::from_str(operator.as_str())
            .map_err(|_| AdminApiError::InvalidIdentifier)?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Execute a GET request carrying the operator header.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        operator: &OperatorId,
    ) -> Result<T, AdminApiError> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .header(&self.inner.identifier_header, Self::identifier_value(operator)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| AdminApiError::MalformedResponse {
            status: status.as_u16(),
            detail: e.to_string(),
        })
    }

    /// Execute a POST request with a JSON body; the success body is ignored.
    async fn post<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        operator: &OperatorId,
        body: &B,
    ) -> Result<(), AdminApiError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .header(&self.inner.identifier_header, Self::identifier_value(operator)?)
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Turn a non-success response into an error.
    ///
    /// A JSON body yields [`AdminApiError::Api`] with its `error` field (which
    /// may be absent); anything else is a malformed response.
    async fn parse_error(response: reqwest::Response) -> AdminApiError {
        let status = response.status().as_u16();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return AdminApiError::Network(e),
        };

        match serde_json::from_slice::<ErrorEnvelope>(&body) {
            Ok(envelope) => AdminApiError::Api {
                status,
                message: envelope.error,
            },
            Err(e) => AdminApiError::MalformedResponse {
                status,
                detail: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    #[instrument(skip(self, operator))]
    async fn pending_requests(
        &self,
        operator: &OperatorId,
    ) -> Result<Vec<PurchaseRequest>, AdminApiError> {
        let envelope: RequestsEnvelope = self.get("/requests", operator).await?;
        let requests = envelope.requests.unwrap_or_default();
        debug!(count = requests.len(), "Fetched pending requests");
        Ok(requests)
    }

    #[instrument(skip(self, operator))]
    async fn users(&self, operator: &OperatorId) -> Result<Vec<UserSummary>, AdminApiError> {
        let envelope: UsersEnvelope = self.get("/users", operator).await?;
        let users = envelope.users.unwrap_or_default();
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    #[instrument(skip(self, operator), fields(request_id = %request_id, decision = %decision))]
    async fn moderate(
        &self,
        operator: &OperatorId,
        request_id: PurchaseRequestId,
        decision: ModerationDecision,
    ) -> Result<(), AdminApiError> {
        let path = match decision {
            ModerationDecision::Approve => "/approve",
            ModerationDecision::Reject => "/reject",
        };
        self.post(path, operator, &ModerationBody { request_id })
            .await?;
        debug!("Moderation accepted by backend");
        Ok(())
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url)
            .field("identifier_header", &self.inner.identifier_header)
            .finish_non_exhaustive()
    }
}
