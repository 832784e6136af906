//! Which upstream orders belong to the tracked set.

use chrono::{DateTime, Utc};

use crate::age::days_since;
use crate::order::RawOrder;
use crate::types::FinancialStatus;

/// Pending orders older than this are treated as abandoned checkouts.
pub const PENDING_GRACE_DAYS: u32 = 7;

/// Whether an order should be tracked at all.
///
/// Requires an id and a creation timestamp, no cancellation marker, and a
/// financial status that represents a live sale:
/// - `paid`, `authorized`, `partially_paid`
/// - `partially_refunded` while the refunded amount is below the total
/// - `pending` for at most [`PENDING_GRACE_DAYS`] days
#[must_use]
pub fn is_valid(order: &RawOrder, now: DateTime<Utc>) -> bool {
    let (Some(_), Some(created_at)) = (order.id, order.created_at) else {
        return false;
    };

    if order.is_cancelled() {
        return false;
    }

    match order.financial_status {
        Some(status) if status.is_settled() => true,
        Some(FinancialStatus::PartiallyRefunded) => {
            match (order.total_price, order.refunded_amount()) {
                (Some(total), Some(refunded)) => refunded < total,
                _ => false,
            }
        }
        Some(FinancialStatus::Pending) => days_since(created_at, now) <= PENDING_GRACE_DAYS,
        _ => false,
    }
}

/// Keep only valid orders, preserving input order.
#[must_use]
pub fn filter_valid(orders: Vec<RawOrder>, now: DateTime<Utc>) -> Vec<RawOrder> {
    orders
        .into_iter()
        .filter(|order| is_valid(order, now))
        .collect()
}
