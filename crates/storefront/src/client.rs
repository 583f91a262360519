//! Client for the player-facing purchase and auth endpoints.

use std::sync::Arc;

use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use winner_core::{DurationCategory, PrivilegeTier};

use crate::catalog::quote;
use crate::error::StorefrontError;
use crate::models::{ErrorEnvelope, PlayerProfile, PurchaseReceipt, PurchaseSubmission};

/// Header the purchase endpoint reads the player's Steam id from.
pub const STEAM_ID_HEADER: &str = "X-Steam-Id";

/// `reqwest`-backed storefront client.
#[derive(Debug, Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

#[derive(Debug)]
struct StoreClientInner {
    client: reqwest::Client,
    purchase_url: Option<String>,
    auth_url: Option<String>,
}

impl StoreClient {
    /// Create a client. Either endpoint may be absent if unused.
    #[must_use]
    pub fn new(purchase_url: Option<&str>, auth_url: Option<&str>) -> Self {
        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                purchase_url: purchase_url.map(|u| u.trim_end_matches('/').to_string()),
                auth_url: auth_url.map(|u| u.trim_end_matches('/').to_string()),
            }),
        }
    }

    /// Submit a purchase request for review.
    ///
    /// The tier/duration combination is checked against the price table
    /// before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `UnavailableCombination` for combinations the store does not
    /// sell, `MissingEndpoint` or `InvalidSteamId` for bad input, and
    /// `Network`, `Api` or `Parse` for transport and backend failures.
    #[instrument(skip(self, steam_id, payment_proof), fields(tier = %tier, duration = %duration))]
    pub async fn submit_purchase(
        &self,
        steam_id: &str,
        tier: PrivilegeTier,
        duration: DurationCategory,
        payment_proof: &str,
    ) -> Result<PurchaseReceipt, StorefrontError> {
        let price = quote(tier, duration)?;

        let url = self
            .inner
            .purchase_url
            .as_deref()
            .ok_or(StorefrontError::MissingEndpoint("PURCHASE_API_URL"))?;

        let steam_id = steam_id.trim();
        if steam_id.is_empty() {
            return Err(StorefrontError::InvalidSteamId);
        }
        let steam_id =
            HeaderValue::from_str(steam_id).map_err(|_| StorefrontError::InvalidSteamId)?;

        let body = PurchaseSubmission {
            privilege_type: tier,
            duration_type: duration,
            payment_proof: payment_proof.to_string(),
        };

        let response = self
            .inner
            .client
            .post(url)
            .header(STEAM_ID_HEADER, steam_id)
            .json(&body)
            .send()
            .await?;

        let receipt: PurchaseReceipt = Self::handle_response(response).await?;
        debug!(request_id = %receipt.request_id, %price, "Purchase request submitted");
        Ok(receipt)
    }

    /// Look up a player and their active privileges.
    ///
    /// # Errors
    ///
    /// Returns `Api` (404 for unknown players), `Network` or `Parse`.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self, steam_id: &str) -> Result<PlayerProfile, StorefrontError> {
        let base = self
            .inner
            .auth_url
            .as_deref()
            .ok_or(StorefrontError::MissingEndpoint("AUTH_API_URL"))?;

        let steam_id = steam_id.trim();
        if steam_id.is_empty() {
            return Err(StorefrontError::InvalidSteamId);
        }

        let url = format!("{base}/user/{}", urlencoding::encode(steam_id));
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StorefrontError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error);
            return Err(StorefrontError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| StorefrontError::Parse(e.to_string()))
    }
}
