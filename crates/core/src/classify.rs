//! Per-order enrichment for the active-orders listing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::age::days_since;
use crate::delivery::{DeliverySignal, detect_delivery};
use crate::order::RawOrder;
use crate::tracking::{TrackedShipment, TrackingSet};
use crate::urgency::{self, PrazoStatus, UrgencyLevel};

/// A raw order plus everything derived from it in one pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedOrder {
    #[serde(flatten)]
    pub order: RawOrder,
    pub days_since_order: u32,
    pub is_delivered: bool,
    pub delivery_signal: Option<DeliverySignal>,
    pub has_tracking: bool,
    pub tracking_numbers: Vec<String>,
    pub tracking: Vec<TrackedShipment>,
    pub urgency_level: UrgencyLevel,
    pub prazo_status: PrazoStatus,
    pub prazo_label: &'static str,
    pub is_late: bool,
}

impl ClassifiedOrder {
    /// Derive every classification field for `order` as of `now`.
    #[must_use]
    pub fn classify(order: RawOrder, now: DateTime<Utc>) -> Self {
        let days_since_order = order.created_at.map_or(0, |created| days_since(created, now));
        let delivery_signal = detect_delivery(&order, days_since_order);
        let is_delivered = delivery_signal.is_some();

        let tracking = TrackingSet::from_order(&order);
        let has_tracking = !tracking.is_empty();
        let urgency = urgency::classify(days_since_order, has_tracking, is_delivered);

        Self {
            order,
            days_since_order,
            is_delivered,
            delivery_signal,
            has_tracking,
            tracking_numbers: tracking.numbers(),
            tracking: tracking.into_shipments(),
            urgency_level: urgency.urgency_level,
            prazo_status: urgency.prazo_status,
            prazo_label: urgency.prazo_status.label(),
            is_late: urgency::is_late(days_since_order, has_tracking),
        }
    }
}

/// Most urgent first; within a bucket, oldest first. Stable.
pub fn sort_by_urgency(orders: &mut [ClassifiedOrder]) {
    orders.sort_by(|a, b| {
        a.urgency_level
            .priority()
            .cmp(&b.urgency_level.priority())
            .then_with(|| b.days_since_order.cmp(&a.days_since_order))
    });
}
