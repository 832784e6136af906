//! Prazo Tracker Server - order SLA tracking over the Shopify Admin API.
//!
//! Library half of the server binary. The CLI links against it to run the
//! same operations without HTTP.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`shopify`] - Shopify Admin REST client
//! - [`fetcher`] - Paginated order fetching
//! - [`service`] - Listing and detail operations
//! - [`error`] - Boundary error taxonomy
//! - [`envelope`] - JSON response envelopes
//! - [`routes`] - Axum router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod shopify;
pub mod state;

pub use config::TrackerConfig;
pub use error::TrackerError;
pub use routes::app;
pub use service::OrdersService;
pub use state::AppState;
