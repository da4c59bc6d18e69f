//! Configuration management for the coverart proxy.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the Spotify
//! client credentials, upstream endpoints, server settings and logging setup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file given on the command line, or else `.env` in the working
//!    directory and then in the local data directory
//! 3. Application defaults (where applicable)

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing_subscriber::EnvFilter;

use crate::{error::ConfigError, types::Credentials};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SEARCH_URL: &str = "https://api.spotify.com/v1/search";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` files.
///
/// When `explicit` is given only that file is read and a missing file is an
/// error. Otherwise the `.env` in the working directory is tried first, then
/// the one in the platform-specific local data directory under
/// `coverart/.env`. Missing files are skipped in that mode; variables that are
/// already set in the process environment are never overwritten.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/coverart/.env`
/// - macOS: `~/Library/Application Support/coverart/.env`
/// - Windows: `%LOCALAPPDATA%/coverart/.env`
///
/// # Returns
///
/// The list of files that were loaded.
pub async fn load_env(explicit: Option<&Path>) -> Result<Vec<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        dotenv::from_path(path).map_err(|e| ConfigError::Env(e.to_string()))?;
        return Ok(vec![path.to_path_buf()]);
    }

    let mut loaded = Vec::new();

    if let Ok(path) = dotenv::dotenv() {
        loaded.push(path);
    }

    let path = data_env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Env(e.to_string()))?;
    }
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))?;
        loaded.push(path);
    }

    Ok(loaded)
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("coverart/.env");
    path
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; without it the proxy and the HTTP trace layer
/// log at `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coverart=info,tower_http=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Returns the address the HTTP server binds to.
///
/// Reads `SERVER_ADDRESS`, falling back to [`DEFAULT_SERVER_ADDRESS`].
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the client credentials used against the token endpoint.
///
/// Reads `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`. Both must be set
/// and non-empty.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
pub fn spotify_credentials() -> Result<Credentials, ConfigError> {
    Ok(Credentials::new(
        required("SPOTIFY_CLIENT_ID")?,
        required("SPOTIFY_CLIENT_SECRET")?,
    ))
}

/// Returns the OAuth token endpoint, `SPOTIFY_API_TOKEN_URL` or the public one.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the catalog search endpoint, `SPOTIFY_API_SEARCH_URL` or the public one.
pub fn spotify_search_url() -> String {
    env::var("SPOTIFY_API_SEARCH_URL").unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string())
}

/// Returns the per-call timeout applied to every outbound request.
pub fn request_timeout() -> Result<Duration, ConfigError> {
    parse_timeout(env::var("SPOTIFY_REQUEST_TIMEOUT_SECS").ok().as_deref())
}

/// Parses a timeout in whole seconds; `None` yields the default.
pub fn parse_timeout(raw: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };

    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name: "SPOTIFY_REQUEST_TIMEOUT_SECS",
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid {
            name: "SPOTIFY_REQUEST_TIMEOUT_SECS",
            reason: e.to_string(),
        }),
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
