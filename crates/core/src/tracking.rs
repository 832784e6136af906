//! Tracking-number aggregation across an order's shipment records.

use std::collections::HashSet;

use serde::Serialize;

use crate::order::{Fulfillment, RawOrder};

/// Carrier label used when the fulfillment does not name one.
pub const UNSPECIFIED_CARRIER: &str = "unspecified";

/// A tracking number with the best carrier and URL known for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedShipment {
    pub number: String,
    pub carrier: String,
    pub url: Option<String>,
}

/// Deduplicated tracking numbers in first-seen order.
///
/// Membership is exact, case-sensitive string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackingSet {
    shipments: Vec<TrackedShipment>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl TrackingSet {
    /// Collect tracking numbers for one order.
    ///
    /// Visits the order-level numbers, then each fulfillment's primary
    /// `tracking_number`, then each fulfillment's `tracking_numbers`.
    #[must_use]
    pub fn from_order(order: &RawOrder) -> Self {
        let mut set = Self::default();

        for number in &order.tracking_numbers {
            set.insert(number, UNSPECIFIED_CARRIER, None);
        }

        for fulfillment in &order.fulfillments {
            if let Some(number) = &fulfillment.tracking_number {
                set.insert(number, carrier_of(fulfillment), fulfillment.tracking_url.as_deref());
            }
        }

        for fulfillment in &order.fulfillments {
            for (index, number) in fulfillment.tracking_numbers.iter().enumerate() {
                let url = fulfillment
                    .tracking_urls
                    .get(index)
                    .or(fulfillment.tracking_url.as_ref().filter(|_| index == 0));
                set.insert(number, carrier_of(fulfillment), url.map(String::as_str));
            }
        }

        set
    }

    /// Insert a number if unseen. Blank numbers are ignored.
    ///
    /// Returns whether the number was added.
    pub fn insert(&mut self, number: &str, carrier: &str, url: Option<&str>) -> bool {
        let number = number.trim();
        if number.is_empty() || self.seen.contains(number) {
            return false;
        }

        self.seen.insert(number.to_string());
        self.shipments.push(TrackedShipment {
            number: number.to_string(),
            carrier: carrier.to_string(),
            url: url.map(str::trim).filter(|u| !u.is_empty()).map(String::from),
        });
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shipments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shipments.is_empty()
    }

    /// The tracking numbers in insertion order.
    #[must_use]
    pub fn numbers(&self) -> Vec<String> {
        self.shipments.iter().map(|s| s.number.clone()).collect()
    }

    /// Look up carrier and URL for a number.
    #[must_use]
    pub fn get(&self, number: &str) -> Option<&TrackedShipment> {
        self.shipments.iter().find(|s| s.number == number)
    }

    #[must_use]
    pub fn into_shipments(self) -> Vec<TrackedShipment> {
        self.shipments
    }
}

fn carrier_of(fulfillment: &Fulfillment) -> &str {
    fulfillment
        .tracking_company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNSPECIFIED_CARRIER)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fulfillment(primary: Option<&str>, numbers: &[&str]) -> Fulfillment {
        Fulfillment {
            tracking_number: primary.map(String::from),
            tracking_numbers: numbers.iter().map(|n| (*n).to_string()).collect(),
            ..Fulfillment::default()
        }
    }

    #[test]
    fn test_duplicate_across_fulfillments_is_collapsed() {
        let order = RawOrder {
            fulfillments: vec![fulfillment(Some("A1"), &[]), fulfillment(None, &["A1", "B2"])],
            ..RawOrder::default()
        };

        let set = TrackingSet::from_order(&order);
        assert_eq!(set.numbers(), vec!["A1", "B2"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_visit_order_is_order_level_then_primary_then_secondary() {
        let order = RawOrder {
            tracking_numbers: vec!["ORD1".to_string()],
            fulfillments: vec![
                fulfillment(Some("P1"), &["S1"]),
                fulfillment(Some("P2"), &["S2", "ORD1"]),
            ],
            ..RawOrder::default()
        };

        let set = TrackingSet::from_order(&order);
        assert_eq!(set.numbers(), vec!["ORD1", "P1", "P2", "S1", "S2"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let order = RawOrder {
            fulfillments: vec![fulfillment(Some("ab123"), &["AB123"])],
            ..RawOrder::default()
        };
        assert_eq!(TrackingSet::from_order(&order).len(), 2);
    }

    #[test]
    fn test_blank_numbers_are_ignored() {
        let order = RawOrder {
            fulfillments: vec![fulfillment(Some("  "), &[""])],
            ..RawOrder::default()
        };
        let set = TrackingSet::from_order(&order);
        assert!(set.is_empty());
    }

    #[test]
    fn test_carrier_and_url_lookup() {
        let order = RawOrder {
            fulfillments: vec![Fulfillment {
                tracking_company: Some("Correios".to_string()),
                tracking_numbers: vec![
                    "LB1".to_string(),
                    "LB2".to_string(),
                    "LB3".to_string(),
                ],
                tracking_urls: vec![
                    "https://rastreio/LB1".to_string(),
                    "https://rastreio/LB2".to_string(),
                ],
                ..Fulfillment::default()
            }],
            ..RawOrder::default()
        };

        let set = TrackingSet::from_order(&order);
        let lb2 = set.get("LB2").unwrap();
        assert_eq!(lb2.carrier, "Correios");
        assert_eq!(lb2.url.as_deref(), Some("https://rastreio/LB2"));
        // Shorter URL list: trailing numbers have no URL.
        assert_eq!(set.get("LB3").unwrap().url, None);
    }

    #[test]
    fn test_missing_carrier_uses_default_label() {
        let order = RawOrder {
            fulfillments: vec![Fulfillment {
                tracking_company: Some(String::new()),
                tracking_number: Some("X9".to_string()),
                tracking_url: Some("https://track/X9".to_string()),
                ..Fulfillment::default()
            }],
            ..RawOrder::default()
        };

        let set = TrackingSet::from_order(&order);
        let shipment = set.get("X9").unwrap();
        assert_eq!(shipment.carrier, UNSPECIFIED_CARRIER);
        assert_eq!(shipment.url.as_deref(), Some("https://track/X9"));
    }

    #[test]
    fn test_first_insert_keeps_its_metadata() {
        let mut set = TrackingSet::default();
        assert!(set.insert("A1", "Loggi", Some("https://loggi/A1")));
        assert!(!set.insert("A1", "Correios", None));
        assert_eq!(set.get("A1").unwrap().carrier, "Loggi");
    }

    #[test]
    fn test_serializes_as_list() {
        let mut set = TrackingSet::default();
        set.insert("A1", "Loggi", None);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"number": "A1", "carrier": "Loggi", "url": null}])
        );
    }
}
