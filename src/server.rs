use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{any, get},
};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{Res, api, management::TokenManager, spotify::CatalogProxy, types::Credentials};

/// State shared by every request handler.
pub struct AppState {
    pub proxy: CatalogProxy,
}

impl AppState {
    /// Wires one HTTP client and one token manager into a catalog proxy.
    pub fn new(
        credentials: Credentials,
        token_url: impl Into<String>,
        search_url: impl Into<String>,
        timeout: Duration,
    ) -> Res<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let tokens = Arc::new(TokenManager::new(client.clone(), credentials, token_url));

        Ok(Self::from_proxy(CatalogProxy::new(client, tokens, search_url)))
    }

    pub fn from_proxy(proxy: CatalogProxy) -> Self {
        Self { proxy }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/coverart", any(api::search))
        .route("/coverart/", any(api::search))
        .fallback(api::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn bind(addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(addr)?;
    Ok(TcpListener::bind(&addr).await?)
}

pub async fn start_api_server(listener: TcpListener, state: Arc<AppState>) -> Res<()> {
    let app = router(state);
    tracing::info!(addr = ?listener.local_addr().ok(), "Serving catalog search");
    axum::serve(listener, app).await?;
    Ok(())
}
