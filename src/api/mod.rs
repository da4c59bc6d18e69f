//! # API Module
//!
//! HTTP endpoints exposed to the frontend.
//!
//! ## Endpoints
//!
//! - [`search`] - `/coverart`, any method. Validates the JSON body, forwards the
//!   search to the Spotify catalog and returns the upstream body verbatim.
//! - [`health`] - `/health`, returns service name and version for monitoring.
//! - [`not_found`] - JSON 404 for every other path.
//!
//! ## Response Shapes
//!
//! | Outcome                   | Status          | Body                                        |
//! |---------------------------|-----------------|---------------------------------------------|
//! | success                   | 200             | upstream JSON                               |
//! | invalid request           | 400             | `{ errors: [{ path, msg }] }`               |
//! | upstream failure          | upstream status | `{ message, spotify_response }`             |
//! | token or network failure  | 500             | `{ status: 500, error: "Internal Server Error" }` |
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::{any, get}};
//! use coverart::api::{health, search};
//!
//! let app = Router::new()
//!     .route("/coverart", any(search))
//!     .route("/health", get(health));
//! ```

mod health;
mod search;

pub use health::health;
pub use search::{not_found, search};
