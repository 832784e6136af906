//! Shopify Admin REST API client (read-only).
//!
//! Only the three endpoints the tracker needs are wrapped:
//! - `orders.json` - paginated listing, cursor in the `Link` header
//! - `orders/{id}.json` - a single order
//! - `customers/{id}.json` - the customer's lifetime order count
//!
//! # Example
//!
//! ```rust,ignore
//! use prazo_server::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config.shopify)?;
//! let order = client.get_order(OrderId::new(450789469)).await?;
//! ```

mod client;
pub mod pagination;

pub use client::{OrderPage, ShopifyClient};

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// No access token is configured.
    #[error("Shopify access token is not configured (set SHOPIFY_ACCESS_TOKEN)")]
    MissingCredential,

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Upstream answered with a non-success status.
    #[error("Shopify returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but lacked a field we rely on.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The caller's deadline passed before the call completed.
    #[error("Deadline exceeded")]
    Cancelled,
}

impl ShopifyError {
    /// Upstream HTTP status, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RateLimited(_) => Some(429),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");

        let err = ShopifyError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Shopify returned 503: unavailable");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_status_is_preserved() {
        let err = ShopifyError::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(ShopifyError::Timeout.status(), None);
    }
}
