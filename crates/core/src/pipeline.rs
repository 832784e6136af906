//! The pure part of the active-orders listing.
//!
//! validity filter -> delivery split -> per-order classification -> sort ->
//! stats. Fetching happens elsewhere; this takes whatever was fetched.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{ClassifiedOrder, sort_by_urgency};
use crate::order::RawOrder;
use crate::stats::{PipelineCounts, Stats};
use crate::validity::filter_valid;

/// Active orders, most urgent first, with their summary.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveOrders {
    pub orders: Vec<ClassifiedOrder>,
    pub stats: Stats,
}

/// Run the classification pipeline over one fetch worth of orders.
#[must_use]
pub fn classify_active(fetched: Vec<RawOrder>, now: DateTime<Utc>) -> ActiveOrders {
    let total_fetched = fetched.len();
    let valid_orders = filter_valid(fetched, now);
    let valid = valid_orders.len();
    let mut delivered_filtered = 0;
    let mut orders = Vec::with_capacity(valid);

    for order in valid_orders {
        let classified = ClassifiedOrder::classify(order, now);
        if classified.is_delivered {
            delivered_filtered += 1;
        } else {
            orders.push(classified);
        }
    }

    sort_by_urgency(&mut orders);

    let counts = PipelineCounts {
        total_fetched,
        valid,
        delivered_filtered,
    };
    let stats = Stats::aggregate(counts, &orders);

    ActiveOrders { orders, stats }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn orders() -> Vec<RawOrder> {
        serde_json::from_value(json!([
            // active, tracked, 21 days -> critico
            {"id": 1, "created_at": "2026-09-25T12:00:00Z", "financial_status": "paid",
             "fulfillments": [{"tracking_number": "A1"}]},
            // delivered by tag
            {"id": 2, "created_at": "2026-10-10T12:00:00Z", "financial_status": "paid",
             "tags": "Entregue"},
            // cancelled
            {"id": 3, "created_at": "2026-10-10T12:00:00Z", "financial_status": "paid",
             "cancelled_at": "2026-10-11T12:00:00Z"},
            // abandoned pending checkout
            {"id": 4, "created_at": "2026-09-01T12:00:00Z", "financial_status": "pending"},
            // active, untracked, 2 days -> aguardando/normal
            {"id": 5, "created_at": "2026-10-14T12:00:00Z", "financial_status": "authorized"},
            // delivered by elapsed time
            {"id": 6, "created_at": "2026-08-01T12:00:00Z", "financial_status": "paid",
             "fulfillment_status": "fulfilled"},
            // no creation timestamp
            {"id": 7, "financial_status": "paid"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_pipeline_counts_and_ordering() {
        let result = classify_active(orders(), now());

        let ids: Vec<u64> = result
            .orders
            .iter()
            .map(|o| o.order.id.unwrap().as_u64())
            .collect();
        assert_eq!(ids, vec![1, 5]);

        assert_eq!(result.stats.total_fetched, 7);
        assert_eq!(result.stats.valid, 4);
        assert_eq!(result.stats.delivered_filtered, 2);
        assert_eq!(result.stats.active, 2);
        assert_eq!(result.stats.by_urgency.critical, 1);
        assert_eq!(result.stats.by_urgency.normal, 1);
        assert!((result.stats.late_percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_active_order_is_delivered() {
        let result = classify_active(orders(), now());
        assert!(result.orders.iter().all(|o| !o.is_delivered));
    }

    #[test]
    fn test_empty_fetch() {
        let result = classify_active(Vec::new(), now());
        assert!(result.orders.is_empty());
        assert_eq!(result.stats, Stats::default());
    }
}
