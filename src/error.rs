//! Error types shared by the token manager, the catalog proxy and the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::types::FieldError;

/// Message returned alongside any upstream failure body.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch from Spotify API";

/// Failure of a single search operation.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Inbound request body did not describe a valid search.
    #[error("invalid search request ({} field errors)", .0.len())]
    Validation(Vec<FieldError>),

    /// Token endpoint was unreachable or refused the credentials.
    #[error("failed to fetch access token: {0}")]
    TokenFetch(String),

    /// Catalog rejected the token even after a forced refresh.
    #[error("catalog rejected access token with status {status}")]
    UpstreamAuth { status: StatusCode, body: Value },

    /// Catalog answered with a non-success status.
    #[error("catalog request failed with status {status}")]
    UpstreamApi { status: StatusCode, body: Value },

    /// Network-level fault, including timeouts and undecodable bodies.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Validation(errors) => {
                tracing::warn!(count = errors.len(), "Rejected invalid search request");
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ProxyError::UpstreamAuth { status, body } | ProxyError::UpstreamApi { status, body } => {
                tracing::warn!(status = %status, "Catalog request failed");
                (
                    status,
                    Json(json!({
                        "message": UPSTREAM_FAILURE_MESSAGE,
                        "spotify_response": body,
                    })),
                )
                    .into_response()
            }
            err @ (ProxyError::TokenFetch(_) | ProxyError::Transport(_)) => {
                tracing::error!(error = %err, "Search failed");
                internal_error()
            }
        }
    }
}

/// Generic 500 body that never carries internal details.
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": 500,
            "error": "Internal Server Error",
        })),
    )
        .into_response()
}

/// Failure while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("cannot load environment file: {0}")]
    Env(String),
}
