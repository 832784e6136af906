//! Prazo Tracker Core - order classification engine.
//!
//! This crate turns raw Shopify orders into the operations team's view of
//! what is late:
//! - `server` - HTTP API and Shopify REST client
//! - `cli` - Command-line access to the same operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clock. Every function that depends on the current time takes
//! `now` as an argument.
//!
//! # Modules
//!
//! - [`order`] - Upstream order schema with lenient deserialization
//! - [`validity`] - Which orders are tracked at all
//! - [`delivery`] - Delivery detection rule table
//! - [`tracking`] - Tracking-number deduplication
//! - [`urgency`] - Prazo ladders and lateness
//! - [`timeline`] - Lifecycle events for the detail view
//! - [`stats`] - Aggregate counts
//! - [`notes`] - AliExpress cross-references
//! - [`detail`] - Single-order projection
//! - [`pipeline`] - The active-orders pipeline

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod age;
pub mod classify;
pub mod delivery;
pub mod detail;
pub mod notes;
pub mod order;
pub mod pipeline;
pub mod stats;
pub mod timeline;
pub mod tracking;
pub mod types;
pub mod urgency;
pub mod validity;

pub use classify::ClassifiedOrder;
pub use detail::OrderDetail;
pub use order::RawOrder;
pub use pipeline::{ActiveOrders, classify_active};
pub use stats::Stats;
pub use types::*;
