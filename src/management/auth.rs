use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, header};
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::ProxyError,
    types::{AccessToken, Credentials, TokenResponse},
    utils,
};

/// Source of wall-clock time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Observable state of the cached token.
///
/// A refresh in progress is not a variant here: it is represented by the
/// refresh gate being held, and callers that need a token wait on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    NoToken,
    Valid,
    Expired,
}

/// Owns the process-wide client credentials token.
///
/// One instance is created at startup and shared by reference with every
/// request handler. Reads take a snapshot of the cached token under a read
/// lock; refreshes are serialized through a single gate so that concurrent
/// callers observing an expired or rejected token trigger one fetch between
/// them.
pub struct TokenManager {
    client: Client,
    credentials: Credentials,
    token_url: String,
    clock: Arc<dyn Clock>,
    token: RwLock<Option<AccessToken>>,
    refresh_gate: Mutex<()>,
}

impl TokenManager {
    pub fn new(client: Client, credentials: Credentials, token_url: impl Into<String>) -> Self {
        TokenManager {
            client,
            credentials,
            token_url: token_url.into(),
            clock: Arc::new(SystemClock),
            token: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the cached token, fetching a new one first if it is missing
    /// or expired.
    pub async fn get_valid_token(&self) -> Result<AccessToken, ProxyError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _refreshing = self.refresh_gate.lock().await;

        // another caller may have finished a refresh while we waited
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        self.fetch_and_replace("expired").await
    }

    /// Replaces a token the catalog rejected, regardless of its expiry.
    ///
    /// If the cached token already differs from `rejected`, a concurrent
    /// caller has refreshed it and the newer token is returned as is.
    pub async fn force_refresh(&self, rejected: &AccessToken) -> Result<AccessToken, ProxyError> {
        let _refreshing = self.refresh_gate.lock().await;

        let current = self.token.read().await.clone();
        if let Some(current) = current {
            if current.value != rejected.value && !current.is_expired_at(self.clock.now()) {
                return Ok(current);
            }
        }

        self.fetch_and_replace("rejected").await
    }

    pub async fn is_expired(&self) -> bool {
        self.status().await != TokenStatus::Valid
    }

    pub async fn status(&self) -> TokenStatus {
        match self.token.read().await.as_ref() {
            None => TokenStatus::NoToken,
            Some(token) if token.is_expired_at(self.clock.now()) => TokenStatus::Expired,
            Some(_) => TokenStatus::Valid,
        }
    }

    async fn cached(&self) -> Option<AccessToken> {
        let now = self.clock.now();
        self.token
            .read()
            .await
            .as_ref()
            .filter(|token| !token.is_expired_at(now))
            .cloned()
    }

    async fn fetch_and_replace(&self, reason: &'static str) -> Result<AccessToken, ProxyError> {
        let response = self.request_token().await?;
        let expires_at = i64::try_from(response.expires_in)
            .ok()
            .and_then(|secs| secs.checked_mul(1000))
            .and_then(Duration::try_milliseconds)
            .and_then(|lifetime| self.clock.now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                ProxyError::TokenFetch(format!(
                    "token lifetime out of range: {}",
                    response.expires_in
                ))
            })?;

        let token = AccessToken {
            value: response.access_token,
            expires_at,
        };
        *self.token.write().await = Some(token.clone());

        tracing::info!(
            reason,
            expires_in = response.expires_in,
            "Updated spotify access token"
        );

        Ok(token)
    }

    async fn request_token(&self) -> Result<TokenResponse, ProxyError> {
        let res = self
            .client
            .post(&self.token_url)
            .header(
                header::AUTHORIZATION,
                utils::basic_auth_header(&self.credentials),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Token endpoint unreachable");
                ProxyError::TokenFetch(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Token endpoint refused credentials");
            return Err(ProxyError::TokenFetch(format!(
                "token endpoint returned {}",
                status
            )));
        }

        res.json::<TokenResponse>()
            .await
            .map_err(|e| ProxyError::TokenFetch(format!("invalid token response: {}", e)))
    }

    pub async fn current_token(&self) -> Option<AccessToken> {
        self.token.read().await.clone()
    }
}
