//! Shape checks for inbound search requests.
//!
//! The frontend posts `{ url, params: { q: { track, artist }, type, market } }`.
//! Every rule is evaluated and all failures are reported together, so a caller
//! can fix a request in one round trip.

use reqwest::Url;
use serde_json::{Map, Value};

use crate::types::{CatalogKind, FieldError, Market, SearchIntent};

/// The only upstream URL callers may target.
pub const SPOTIFY_SEARCH_API_URL: &str = "https://api.spotify.com/v1/search";

/// Turns a raw request body into a [`SearchIntent`].
pub fn validate_search_request(body: &Value) -> Result<SearchIntent, Vec<FieldError>> {
    let mut errors = Vec::new();

    check_url(body.get("url"), &mut errors);

    let params = match body.get("params") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("params", "Missing Params"));
            None
        }
        Some(Value::Object(params)) => Some(params),
        Some(_) => {
            errors.push(FieldError::new("params", "Params must be an object"));
            None
        }
    };

    let Some(params) = params else {
        return Err(errors);
    };

    let (track_name, artist_name) = check_terms(params.get("q"), &mut errors);
    let types = check_types(params.get("type"), &mut errors);
    let market = check_market(params.get("market"), &mut errors);

    if errors.is_empty() {
        Ok(SearchIntent {
            track_name,
            artist_name,
            types,
            market,
        })
    } else {
        Err(errors)
    }
}

fn check_url(url: Option<&Value>, errors: &mut Vec<FieldError>) {
    let url = match url {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim(),
        _ => {
            errors.push(FieldError::new("url", "Missing URL"));
            return;
        }
    };

    let is_http = Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some())
        .unwrap_or(false);
    if !is_http {
        errors.push(FieldError::new("url", "Not a valid HTTP/HTTPS URL"));
    }

    if !url.eq_ignore_ascii_case(SPOTIFY_SEARCH_API_URL) {
        errors.push(FieldError::new("url", "Not a valid Spotify Search API URL"));
    }
}

fn check_terms(
    q: Option<&Value>,
    errors: &mut Vec<FieldError>,
) -> (Option<String>, Option<String>) {
    let terms: &Map<String, Value> = match q {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(
                "params.q",
                "Query parameter \"q\" is required",
            ));
            return (None, None);
        }
        Some(Value::Object(terms)) => terms,
        Some(_) => {
            errors.push(FieldError::new(
                "params.q",
                "Query parameter \"q\" must be an object",
            ));
            return (None, None);
        }
    };

    let mut term = |key: &str| match terms.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                format!("params.q.{}", key),
                format!("{} must be a string", key),
            ));
            None
        }
    };

    let track = term("track");
    let artist = term("artist");
    (track, artist)
}

fn check_types(types: Option<&Value>, errors: &mut Vec<FieldError>) -> Vec<CatalogKind> {
    let Some(Value::Array(raw)) = types else {
        errors.push(FieldError::new("params.type", "Type must be an array"));
        return Vec::new();
    };

    if raw.is_empty() {
        errors.push(FieldError::new(
            "params.type",
            "Query parameter \"type\" is required",
        ));
        return Vec::new();
    }

    let kinds: Option<Vec<CatalogKind>> = raw
        .iter()
        .map(|v| v.as_str().and_then(|s| s.parse().ok()))
        .collect();

    kinds.unwrap_or_else(|| {
        let allowed = CatalogKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        errors.push(FieldError::new(
            "params.type",
            format!("Type must be one of: {}", allowed),
        ));
        Vec::new()
    })
}

fn check_market(market: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Market> {
    let parsed = match market {
        None | Some(Value::Null) => return None,
        Some(Value::String(code)) => Market::parse(code),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.push(FieldError::new(
            "params.market",
            "Not a valid ISO 3166-1 alpha-2 country code",
        ));
    }
    parsed
}
