//! Unified error handling for the tracker API.

use std::backtrace::Backtrace;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prazo_core::types::OrderIdError;
use serde::Serialize;
use thiserror::Error;

use crate::envelope::ErrorEnvelope;
use crate::shopify::ShopifyError;

/// Errors that reach the boundary of an order operation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Missing credential or invalid configuration. Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream returned non-2xx, timed out, or sent an unreadable body.
    #[error("Upstream fetch failed{}: {message}", format_status(.status))]
    FetchFailed {
        status: Option<u16>,
        message: String,
    },

    /// The requested order does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller sent something unusable, such as a non-numeric order id.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The request deadline passed before upstream answered.
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    FetchFailed,
    NotFound,
    MalformedInput,
    Cancelled,
}

impl TrackerError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::Cancelled(_) => ErrorKind::Cancelled,
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::FetchFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::Cancelled(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Server-side failures worth an error report.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::FetchFailed { .. })
    }

    /// Message safe to return to API clients.
    ///
    /// Upstream response bodies stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::FetchFailed {
                status: Some(status),
                ..
            } => format!("Shopify request failed with status {status}"),
            Self::FetchFailed { status: None, .. } => "Shopify request failed".to_string(),
            _ => self.to_string(),
        }
    }
}

#[allow(clippy::ref_option)]
fn format_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl From<ShopifyError> for TrackerError {
    fn from(error: ShopifyError) -> Self {
        match error {
            ShopifyError::MissingCredential => Self::Configuration(error.to_string()),
            ShopifyError::NotFound(what) => Self::NotFound(what),
            ShopifyError::Cancelled => Self::Cancelled("deadline exceeded".to_string()),
            ShopifyError::Status { status, body } => Self::FetchFailed {
                status: Some(status),
                message: body,
            },
            other => Self::FetchFailed {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl From<OrderIdError> for TrackerError {
    fn from(error: OrderIdError) -> Self {
        Self::MalformedInput(error.to_string())
    }
}

/// A [`TrackerError`] on its way out of an HTTP handler.
#[derive(Debug)]
pub struct ApiError {
    error: TrackerError,
    details: Option<String>,
}

impl ApiError {
    /// Wrap an error; `dev_mode` attaches a backtrace as `details`.
    #[must_use]
    pub fn new(error: TrackerError, dev_mode: bool) -> Self {
        let details = dev_mode.then(|| Backtrace::force_capture().to_string());
        Self { error, details }
    }

    #[must_use]
    pub const fn error(&self) -> &TrackerError {
        &self.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_server_error() {
            let event_id = sentry::capture_error(&self.error);
            tracing::error!(
                error = %self.error,
                sentry_event_id = %event_id,
                "Tracker request error"
            );
        } else {
            tracing::info!(error = %self.error, "Tracker request rejected");
        }

        let status = self.error.status_code();
        let body = ErrorEnvelope::new(&self.error, self.details);
        (status, Json(body)).into_response()
    }
}
