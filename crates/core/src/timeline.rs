//! Lifecycle events for the order detail view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::order::RawOrder;
use crate::types::FinancialStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderCreated,
    PaymentConfirmed,
    OrderShipped,
    OrderDelivered,
}

/// One entry of an order timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

/// Build the timeline for an order created at `created_at`.
///
/// Events are sorted by timestamp; ties keep their construction order
/// (placed, paid, shipped, delivered).
#[must_use]
pub fn build_timeline(order: &RawOrder, created_at: DateTime<Utc>) -> Vec<Event> {
    let mut events = vec![Event {
        kind: EventKind::OrderCreated,
        title: "Pedido realizado".to_string(),
        description: order.name.as_ref().map_or_else(
            || "Pedido recebido pela loja".to_string(),
            |name| format!("Pedido {name} recebido pela loja"),
        ),
        timestamp: created_at,
        completed: true,
        tracking_number: None,
    }];

    if order.financial_status == Some(FinancialStatus::Paid) {
        events.push(Event {
            kind: EventKind::PaymentConfirmed,
            title: "Pagamento confirmado".to_string(),
            description: "Pagamento aprovado".to_string(),
            timestamp: order.processed_at.unwrap_or(created_at),
            completed: true,
            tracking_number: None,
        });
    }

    for fulfillment in &order.fulfillments {
        if !(fulfillment.status_is("success") || fulfillment.status_is("fulfilled")) {
            continue;
        }
        let Some(shipped_at) = fulfillment.created_at else {
            continue;
        };

        let tracking_number = fulfillment
            .tracking_number
            .clone()
            .or_else(|| fulfillment.tracking_numbers.first().cloned());
        let description = match (&tracking_number, fulfillment.tracking_company.as_deref()) {
            (Some(number), Some(carrier)) => format!("Enviado via {carrier}, rastreio {number}"),
            (Some(number), None) => format!("Enviado, rastreio {number}"),
            (None, _) => "Pedido enviado".to_string(),
        };

        events.push(Event {
            kind: EventKind::OrderShipped,
            title: "Pedido enviado".to_string(),
            description,
            timestamp: shipped_at,
            completed: true,
            tracking_number,
        });
    }

    for fulfillment in &order.fulfillments {
        if !fulfillment.shipment_status_is("delivered") {
            continue;
        }
        let Some(delivered_at) = fulfillment.updated_at.or(fulfillment.created_at) else {
            continue;
        };

        events.push(Event {
            kind: EventKind::OrderDelivered,
            title: "Pedido entregue".to_string(),
            description: "Entrega confirmada pela transportadora".to_string(),
            timestamp: delivered_at,
            completed: true,
            tracking_number: fulfillment.tracking_number.clone(),
        });
    }

    events.sort_by_key(|event| event.timestamp);
    events
}
