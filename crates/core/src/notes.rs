//! AliExpress cross-references buried in order notes.
//!
//! Dropshipped orders carry the supplier order number either in the free-text
//! note ("AliExpress Order: 8123...") or in a checkout note attribute written
//! by the sourcing app, plus the buyer account id (`br` followed by digits).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::order::RawOrder;

/// Tracking page for a given AliExpress order id.
pub const ALIEXPRESS_TRACKING_URL: &str =
    "https://track.aliexpress.com/logisticsdetail.htm?tradeId=";

static ORDER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ali\s*express\s+order\s*(?:id|n[º°o]\.?|number)?\s*[:#\-]*\s*(\d+)")
        .expect("valid AliExpress order regex")
});

static ACCOUNT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(br\d+)\b").expect("valid account regex"));

/// One supplier order with its tracking link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliExpressOrder {
    pub order_id: String,
    pub tracking_url: String,
}

/// Everything extracted from an order's note and note attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliExpressReference {
    pub orders: Vec<AliExpressOrder>,
    pub account_id: Option<String>,
}

impl AliExpressReference {
    /// Scan the note first, then the note attributes, in order.
    #[must_use]
    pub fn from_order(order: &RawOrder) -> Self {
        let mut reference = Self::default();

        if let Some(note) = order.note.as_deref() {
            reference.scan_text(note);
        }

        for attribute in &order.note_attributes {
            let Some(value) = attribute.value.as_deref() else {
                continue;
            };

            let key_names_aliexpress = attribute
                .name
                .to_lowercase()
                .replace(' ', "")
                .contains("aliexpress");
            let bare_digits = value.trim();
            if key_names_aliexpress
                && !bare_digits.is_empty()
                && bare_digits.bytes().all(|b| b.is_ascii_digit())
            {
                reference.push_order(bare_digits);
            }

            reference.scan_text(value);
        }

        reference
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.account_id.is_none()
    }

    /// Supplier order ids in first-seen order.
    #[must_use]
    pub fn order_ids(&self) -> Vec<&str> {
        self.orders.iter().map(|o| o.order_id.as_str()).collect()
    }

    fn scan_text(&mut self, text: &str) {
        for capture in ORDER_MARKER.captures_iter(text) {
            if let Some(id) = capture.get(1) {
                self.push_order(id.as_str());
            }
        }

        if self.account_id.is_none()
            && let Some(account) = ACCOUNT_MARKER.captures(text).and_then(|c| c.get(1))
        {
            self.account_id = Some(account.as_str().to_lowercase());
        }
    }

    fn push_order(&mut self, order_id: &str) {
        if self.orders.iter().any(|o| o.order_id == order_id) {
            return;
        }
        self.orders.push(AliExpressOrder {
            order_id: order_id.to_string(),
            tracking_url: format!("{ALIEXPRESS_TRACKING_URL}{order_id}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NoteAttribute;

    fn with_note(note: &str) -> RawOrder {
        RawOrder {
            note: Some(note.to_string()),
            ..RawOrder::default()
        }
    }

    fn attribute(name: &str, value: &str) -> NoteAttribute {
        NoteAttribute {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn test_order_ids_from_note() {
        let order = with_note(
            "AliExpress Order: 8123456789012345\nAliexpress order #8000000000000001 (2 itens)",
        );
        let reference = AliExpressReference::from_order(&order);
        assert_eq!(
            reference.order_ids(),
            vec!["8123456789012345", "8000000000000001"]
        );
        assert_eq!(
            reference.orders[0].tracking_url,
            "https://track.aliexpress.com/logisticsdetail.htm?tradeId=8123456789012345"
        );
    }

    #[test]
    fn test_account_id_marker() {
        let order = with_note("Conta BR2871234567 - AliExpress Order 81234");
        let reference = AliExpressReference::from_order(&order);
        assert_eq!(reference.account_id.as_deref(), Some("br2871234567"));
        assert_eq!(reference.order_ids(), vec!["81234"]);
    }

    #[test]
    fn test_note_attributes_are_scanned() {
        let order = RawOrder {
            note_attributes: vec![
                attribute("AliExpress Order ID", "8111"),
                attribute("Dropshipping", "AliExpress Order Nº 8222, conta br99"),
                attribute("gift", "sim"),
            ],
            ..RawOrder::default()
        };

        let reference = AliExpressReference::from_order(&order);
        assert_eq!(reference.order_ids(), vec!["8111", "8222"]);
        assert_eq!(reference.account_id.as_deref(), Some("br99"));
    }

    #[test]
    fn test_duplicates_across_note_and_attributes_are_collapsed() {
        let order = RawOrder {
            note: Some("AliExpress Order: 8333".to_string()),
            note_attributes: vec![attribute("aliexpress_order", "8333")],
            ..RawOrder::default()
        };
        assert_eq!(AliExpressReference::from_order(&order).order_ids(), vec!["8333"]);
    }

    #[test]
    fn test_no_reference() {
        let order = with_note("Entregar após as 18h. Número 1234, apto 56. Brasil");
        let reference = AliExpressReference::from_order(&order);
        assert!(reference.is_empty());
    }

    #[test]
    fn test_digits_without_marker_are_ignored() {
        let order = RawOrder {
            note_attributes: vec![attribute("cpf", "12345678900")],
            ..RawOrder::default()
        };
        assert!(AliExpressReference::from_order(&order).orders.is_empty());
    }
}
