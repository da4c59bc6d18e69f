//! # Spotify Integration Module
//!
//! Outbound side of the proxy: everything that talks to the Spotify Web API
//! lives here or in [`crate::management`].
//!
//! ```text
//! HTTP handler (api)
//!          ↓
//! CatalogProxy ── build_query ──> https://api.spotify.com/v1/search
//!          ↓
//! TokenManager ── client credentials ──> https://accounts.spotify.com/api/token
//! ```
//!
//! ## Authentication Strategy
//!
//! The proxy authenticates as itself through the OAuth 2.0 client credentials
//! grant. No end user is involved, so there is no refresh token: an expired or
//! rejected access token is simply replaced by fetching a new one with the
//! client id and secret.
//!
//! ## Error Handling
//!
//! - A `401` from the catalog forces one token refresh and one retry
//! - Any other non-success status is passed back to the caller with the
//!   upstream body
//! - Transport faults and timeouts are not retried

pub mod search;

pub use search::{CatalogProxy, build_query};
