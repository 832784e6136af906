//! Status enums reported by the Shopify Admin REST API.
//!
//! Values arrive as lowercase snake_case strings. Statuses this crate does not
//! know about deserialize to `Other` rather than failing the whole page.

use serde::{Deserialize, Serialize};

/// Order financial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    Expired,
    #[serde(other)]
    Other,
}

impl FinancialStatus {
    /// Statuses that always count as a tracked sale.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Paid | Self::Authorized | Self::PartiallyPaid)
    }
}

/// Order-level fulfillment status.
///
/// Shopify reports `null` for unfulfilled orders, so this is always carried
/// as an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Fulfilled,
    Partial,
    Restocked,
    Unfulfilled,
    #[serde(other)]
    Other,
}
