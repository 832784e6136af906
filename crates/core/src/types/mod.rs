//! Core types for Prazo Tracker.
//!
//! Type-safe identifiers and the status enums the upstream API reports.

pub mod id;
pub mod status;

pub use id::*;
pub use status::*;
