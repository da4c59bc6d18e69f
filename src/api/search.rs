use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::IntoResponse,
};
use serde_json::{Value, json};

use crate::{error::ProxyError, server::AppState, types::FieldError, validation};

/// Handles `/coverart` for any HTTP method.
///
/// The method of the inbound request is forwarded to the catalog unchanged.
pub async fn search(
    State(state): State<Arc<AppState>>,
    method: Method,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ProxyError> {
    let Json(body) = payload
        .map_err(|e| ProxyError::Validation(vec![FieldError::new("body", e.body_text())]))?;

    let intent = validation::validate_search_request(&body).map_err(ProxyError::Validation)?;

    tracing::debug!(
        method = %method,
        types = intent.types.len(),
        market = intent.market.as_ref().map(|m| m.as_str()),
        "Forwarding catalog search"
    );

    let data = state.proxy.search(&intent, method).await?;
    Ok(Json(data))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": 404, "error": "Not Found" })),
    )
}
