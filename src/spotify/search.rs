use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::{
    error::ProxyError,
    management::TokenManager,
    types::{AccessToken, SearchIntent},
    utils,
};

/// Position of a search within its single allowed retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retried,
}

/// Forwards search intents to the catalog search endpoint.
///
/// Tokens come from the shared [`TokenManager`]. A `401` on the first attempt
/// forces one token refresh and one retry; every other outcome is final.
#[derive(Clone)]
pub struct CatalogProxy {
    client: Client,
    tokens: Arc<TokenManager>,
    search_url: String,
}

impl CatalogProxy {
    pub fn new(client: Client, tokens: Arc<TokenManager>, search_url: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            search_url: search_url.into(),
        }
    }

    /// Full upstream URL for `intent`.
    pub fn search_url(&self, intent: &SearchIntent) -> String {
        format!("{}?{}", self.search_url, build_query(intent))
    }

    /// Runs a catalog search and returns the upstream body untouched.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::TokenFetch`] when no token can be obtained
    /// - [`ProxyError::UpstreamAuth`] when the retried call is still unauthorized
    /// - [`ProxyError::UpstreamApi`] for any other non-success status
    /// - [`ProxyError::Transport`] for network faults and timeouts
    pub async fn search(&self, intent: &SearchIntent, method: Method) -> Result<Value, ProxyError> {
        let url = self.search_url(intent);
        let mut token = self.tokens.get_valid_token().await?;
        let mut attempt = Attempt::Initial;

        loop {
            let response = self.send(&method, &url, &token).await?;
            let status = response.status();

            match (status, attempt) {
                (status, Attempt::Initial) if status == StatusCode::UNAUTHORIZED => {
                    tracing::warn!("Catalog rejected access token, refreshing once");
                    token = self.tokens.force_refresh(&token).await?;
                    attempt = Attempt::Retried;
                }
                (status, Attempt::Retried) if status == StatusCode::UNAUTHORIZED => {
                    let body = error_body(response).await;
                    return Err(ProxyError::UpstreamAuth { status, body });
                }
                (status, _) if status.is_success() => {
                    tracing::debug!(status = %status, ?attempt, "Catalog search succeeded");
                    return Ok(response.json::<Value>().await?);
                }
                (status, _) => {
                    let body = error_body(response).await;
                    return Err(ProxyError::UpstreamApi { status, body });
                }
            }
        }
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        token: &AccessToken,
    ) -> Result<Response, ProxyError> {
        let response = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&token.value)
            .send()
            .await?;
        Ok(response)
    }
}

/// Builds the catalog query string for `intent`.
///
/// `q` concatenates `track:<name> ` and `artist:<name>` in that order and is
/// trimmed; `type` joins the kinds with commas; `market` is only present when
/// set. Equal intents always produce byte-identical output.
pub fn build_query(intent: &SearchIntent) -> String {
    let mut q = String::new();
    if let Some(track) = intent.track_name.as_deref().filter(|t| !t.is_empty()) {
        q.push_str(&format!("track:{} ", track));
    }
    if let Some(artist) = intent.artist_name.as_deref().filter(|a| !a.is_empty()) {
        q.push_str(&format!("artist:{}", artist));
    }

    let types = intent
        .types
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let mut pairs = vec![("q", q.trim().to_string()), ("type", types)];
    if let Some(market) = &intent.market {
        pairs.push(("market", market.as_str().to_string()));
    }

    utils::encode_query_pairs(&pairs)
}

// Non-JSON error bodies are kept as a JSON string so callers still see them.
async fn error_body(response: Response) -> Value {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(_) => Value::Null,
    }
}
