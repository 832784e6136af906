//! Upstream order schema (Shopify Admin REST `orders.json`).
//!
//! Every field except the nested collections is optional: the REST API omits
//! or nulls fields freely depending on API version, app scopes and order age,
//! and one odd record must never fail deserialization of a whole page.
//! Default substitution for display happens once, in [`crate::detail`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    CustomerId, FinancialStatus, FulfillmentId, FulfillmentStatus, LineItemId, OrderId,
};

/// An order exactly as received from the listing or single-order endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub id: Option<OrderId>,
    /// Display name, e.g. `#1042`.
    pub name: Option<String>,
    pub order_number: Option<u64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub closed_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub financial_status: Option<FinancialStatus>,
    pub fulfillment_status: Option<FulfillmentStatus>,
    pub currency: Option<String>,
    pub total_price: Option<Decimal>,
    pub subtotal_price: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub total_discounts: Option<Decimal>,
    /// Not part of the stock REST payload; some proxies and exports add it.
    /// When absent, the refunded amount is summed from `refunds`.
    pub total_refunds: Option<Decimal>,
    /// Comma-separated tag string.
    pub tags: Option<String>,
    pub note: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub note_attributes: Vec<NoteAttribute>,
    /// Order-level tracking numbers, populated by some fulfillment apps.
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub tracking_numbers: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub fulfillments: Vec<Fulfillment>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub discount_codes: Vec<DiscountCode>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub refunds: Vec<Refund>,
    pub customer: Option<Customer>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
}

impl RawOrder {
    /// Whether the order carries any cancellation marker.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled_at.is_some() || self.cancel_reason.is_some()
    }

    /// Individual tags, trimmed, in their original order.
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total amount refunded so far.
    ///
    /// Prefers `total_refunds` when present; otherwise sums successful refund
    /// transactions. `None` when that sum overflows.
    #[must_use]
    pub fn refunded_amount(&self) -> Option<Decimal> {
        if let Some(total) = self.total_refunds {
            return Some(total);
        }

        self.refunds
            .iter()
            .flat_map(|refund| &refund.transactions)
            .filter(|tx| tx.counts_as_refund())
            .filter_map(|tx| tx.amount)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Sum of all shipping line prices, saturating on overflow.
    #[must_use]
    pub fn shipping_total(&self) -> Decimal {
        self.shipping_lines
            .iter()
            .filter_map(|line| line.price)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

/// Key/value pair attached to an order at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteAttribute {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::string_like")]
    pub value: Option<String>,
}

/// A purchased line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Option<LineItemId>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub variant_title: Option<String>,
    pub sku: Option<String>,
    pub vendor: Option<String>,
    pub product_id: Option<u64>,
    pub variant_id: Option<u64>,
    #[serde(default)]
    pub quantity: u32,
    pub price: Option<Decimal>,
    pub total_discount: Option<Decimal>,
    pub fulfillment_status: Option<String>,
}

/// A shipment record covering some or all of an order's line items.
///
/// `tracking_numbers` and `tracking_urls` are index-aligned; the URL list may
/// be shorter, in which case the trailing numbers simply have no URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fulfillment {
    pub id: Option<FulfillmentId>,
    pub status: Option<String>,
    pub shipment_status: Option<String>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    pub tracking_company: Option<String>,
    pub tracking_number: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub tracking_numbers: Vec<String>,
    pub tracking_url: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub tracking_urls: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub line_items: Vec<LineItem>,
}

impl Fulfillment {
    /// Case-insensitive comparison against the fulfillment `status`.
    #[must_use]
    pub fn status_is(&self, expected: &str) -> bool {
        eq_folded(self.status.as_deref(), expected)
    }

    /// Case-insensitive comparison against the carrier `shipment_status`.
    #[must_use]
    pub fn shipment_status_is(&self, expected: &str) -> bool {
        eq_folded(self.shipment_status.as_deref(), expected)
    }
}

fn eq_folded(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case(expected))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub title: Option<String>,
    pub code: Option<String>,
    pub source: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub code: Option<String>,
    pub amount: Option<Decimal>,
    /// `fixed_amount`, `percentage` or `shipping`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "de::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: Option<String>,
    pub status: Option<String>,
    pub amount: Option<Decimal>,
}

impl Transaction {
    fn counts_as_refund(&self) -> bool {
        let is_refund = self
            .kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("refund"));
        let succeeded = self
            .status
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case("success"));
        is_refund && succeeded
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub orders_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub province_code: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Lenient deserializers for upstream quirks.
mod de {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// RFC 3339 timestamp; anything unparseable becomes `None`.
    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    /// Treat an explicit `null` like a missing field.
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Accept strings, numbers and booleans as a string value.
    pub fn string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }
}
