//! Spotify Catalog Search Proxy Library
//!
//! This library provides a backend façade for a trusted frontend: it validates
//! search requests, reshapes them into the Spotify search grammar and forwards
//! them with a server-held client credentials token that callers never see.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the search, health and fallback routes
//! - `config` - Configuration management, environment variables and logging setup
//! - `error` - Error types and their HTTP representation
//! - `management` - Access token lifecycle (fetch, cache, expiry, refresh)
//! - `server` - Shared application state, router and listener
//! - `spotify` - Catalog search client and query building
//! - `types` - Data structures and type definitions
//! - `utils` - Header and query string encoding helpers
//! - `validation` - Inbound request shape checks
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use coverart::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> coverart::Res<()> {
//!     config::load_env(None).await?;
//!     let state = server::AppState::new(
//!         config::spotify_credentials()?,
//!         config::spotify_apitoken_url(),
//!         config::spotify_search_url(),
//!         config::request_timeout()?,
//!     )?;
//!     let listener = server::bind(&config::server_addr()).await?;
//!     server::start_api_server(listener, Arc::new(state)).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod validation;

/// A convenient Result type alias for process-level plumbing.
///
/// Used where any failure is fatal to startup (binding, serving, building the
/// HTTP client). Request-level failures use [`error::ProxyError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a startup notice with a blue bullet point.
///
/// Console output for the operator running the binary. Request-time events go
/// through `tracing` instead.
///
/// # Example
///
/// ```
/// info!("Loaded environment from {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Listening on http://{}", addr);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message to stderr and exits with code 1.
///
/// Only for startup failures the proxy cannot run without, such as missing
/// client credentials or an address that cannot be bound.
///
/// # Example
///
/// ```
/// error!("Cannot load credentials. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("No .env file found, using process environment only");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
