use base64::{Engine, engine::general_purpose::STANDARD};

use crate::types::Credentials;

/// Builds the `Authorization` header value for the token endpoint.
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let raw = format!(
        "{id}:{secret}",
        id = credentials.client_id,
        secret = credentials.client_secret
    );
    format!("Basic {}", STANDARD.encode(raw))
}

/// Joins key/value pairs into a query string, percent-encoding every value.
///
/// Spaces become `%20` rather than `+`, which is what the catalog search
/// grammar expects inside `q`.
pub fn encode_query_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
