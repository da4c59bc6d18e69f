#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration as StdDuration,
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use coverart::{
    management::{Clock, TokenManager},
    spotify::CatalogProxy,
    types::{CatalogKind, Credentials, Market, SearchIntent},
};
use reqwest::Client;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const TOKEN_PATH: &str = "/api/token";
pub const SEARCH_PATH: &str = "/v1/search";
// base64("client-id:client-secret")
pub const EXPECTED_BASIC: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

/// Clock that only moves when a test tells it to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn credentials() -> Credentials {
    Credentials::new("client-id", "client-secret")
}

pub fn http_client() -> Client {
    Client::builder()
        .timeout(StdDuration::from_secs(5))
        .build()
        .unwrap()
}

pub fn token_manager(server: &MockServer, clock: Arc<ManualClock>) -> Arc<TokenManager> {
    Arc::new(
        TokenManager::new(
            http_client(),
            credentials(),
            format!("{}{}", server.uri(), TOKEN_PATH),
        )
        .with_clock(clock),
    )
}

pub fn catalog_proxy(server: &MockServer, tokens: Arc<TokenManager>) -> CatalogProxy {
    CatalogProxy::new(
        http_client(),
        tokens,
        format!("{}{}", server.uri(), SEARCH_PATH),
    )
}

pub fn token_body(token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in,
    }))
}

/// Token endpoint answering once with `token`.
pub async fn mount_token_once(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_body(token, 3600))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

pub async fn token_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == TOKEN_PATH)
        .count()
}

pub fn yesterday_intent() -> SearchIntent {
    SearchIntent {
        track_name: Some("Yesterday".to_string()),
        artist_name: Some("Beatles".to_string()),
        types: vec![CatalogKind::Track],
        market: None,
    }
}

pub fn beatles_albums_intent() -> SearchIntent {
    SearchIntent {
        track_name: None,
        artist_name: Some("Beatles".to_string()),
        types: vec![CatalogKind::Album, CatalogKind::Track],
        market: Market::parse("US"),
    }
}
