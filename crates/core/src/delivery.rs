//! Delivery detection from weak, partially unreliable signals.
//!
//! Carriers rarely push a terminal status back into the store, so delivery is
//! inferred from an ordered rule table. Rules run in order and the first one
//! that fires decides; the elapsed-time fallback sits last because it is the
//! least precise.

use serde::Serialize;

use crate::order::RawOrder;
use crate::types::FulfillmentStatus;

/// Tag fragments (lowercase) that mark an order as delivered.
pub const DELIVERED_TAGS: &[&str] = &[
    "entregue",
    "delivered",
    "finalizado",
    "concluido",
    "completo",
];

/// Note fragments (lowercase) that mark an order as delivered.
pub const DELIVERED_NOTE_MARKERS: &[&str] = &["entregue", "delivered"];

/// Fulfilled orders older than this are presumed delivered.
pub const PRESUMED_DELIVERED_AFTER_DAYS: u32 = 60;

/// Which rule established that an order was delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverySignal {
    /// A fulfillment reports `delivered` as its status or shipment status.
    ShipmentStatus,
    /// The order is tagged as delivered.
    Tag,
    /// The order note mentions delivery.
    Note,
    /// Fulfilled long enough ago that delivery is presumed.
    ElapsedTime,
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryContext<'a> {
    pub order: &'a RawOrder,
    pub days_since_order: u32,
}

/// One entry of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryRule {
    pub signal: DeliverySignal,
    pub matches: fn(&DeliveryContext<'_>) -> bool,
}

/// The rule table, cheapest and most reliable first.
pub const DELIVERY_RULES: &[DeliveryRule] = &[
    DeliveryRule {
        signal: DeliverySignal::ShipmentStatus,
        matches: shipment_reports_delivered,
    },
    DeliveryRule {
        signal: DeliverySignal::Tag,
        matches: tagged_delivered,
    },
    DeliveryRule {
        signal: DeliverySignal::Note,
        matches: note_mentions_delivery,
    },
    DeliveryRule {
        signal: DeliverySignal::ElapsedTime,
        matches: fulfilled_long_ago,
    },
];

fn shipment_reports_delivered(ctx: &DeliveryContext<'_>) -> bool {
    ctx.order
        .fulfillments
        .iter()
        .any(|f| f.shipment_status_is("delivered") || f.status_is("delivered"))
}

fn tagged_delivered(ctx: &DeliveryContext<'_>) -> bool {
    ctx.order.tags.as_deref().is_some_and(|tags| {
        let tags = tags.to_lowercase();
        DELIVERED_TAGS.iter().any(|marker| tags.contains(marker))
    })
}

fn note_mentions_delivery(ctx: &DeliveryContext<'_>) -> bool {
    ctx.order.note.as_deref().is_some_and(|note| {
        let note = note.to_lowercase();
        DELIVERED_NOTE_MARKERS.iter().any(|marker| note.contains(marker))
    })
}

fn fulfilled_long_ago(ctx: &DeliveryContext<'_>) -> bool {
    ctx.order.fulfillment_status == Some(FulfillmentStatus::Fulfilled)
        && ctx.days_since_order > PRESUMED_DELIVERED_AFTER_DAYS
}

/// The first delivery signal found for an order, if any.
///
/// `days_since_order` is the age the caller already resolved for the order,
/// so the elapsed-time rule and the urgency ladder agree.
#[must_use]
pub fn detect_delivery(order: &RawOrder, days_since_order: u32) -> Option<DeliverySignal> {
    let ctx = DeliveryContext {
        order,
        days_since_order,
    };

    DELIVERY_RULES
        .iter()
        .find(|rule| (rule.matches)(&ctx))
        .map(|rule| rule.signal)
}
