use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client credentials registered with the Spotify developer platform.
///
/// The secret never leaves the process: it is only used to build the Basic
/// authorization header for the token endpoint and is redacted from `Debug`.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token obtained through the client credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds, relative to the moment of the response.
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Object kinds accepted by the catalog search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
    Audiobook,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 7] = [
        CatalogKind::Album,
        CatalogKind::Artist,
        CatalogKind::Playlist,
        CatalogKind::Track,
        CatalogKind::Show,
        CatalogKind::Episode,
        CatalogKind::Audiobook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Album => "album",
            CatalogKind::Artist => "artist",
            CatalogKind::Playlist => "playlist",
            CatalogKind::Track => "track",
            CatalogKind::Show => "show",
            CatalogKind::Episode => "episode",
            CatalogKind::Audiobook => "audiobook",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown catalog kind: {}", s))
    }
}

/// ISO 3166-1 alpha-2 market code, always two uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Market(String);

impl Market {
    pub fn parse(code: &str) -> Option<Self> {
        let valid = code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase());
        valid.then(|| Market(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated description of what the caller wants to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchIntent {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub types: Vec<CatalogKind>,
    pub market: Option<Market>,
}

/// Field-level validation message returned to the caller with a 400.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }
}
