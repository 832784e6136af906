//! Elapsed-time helpers.

use chrono::{DateTime, Utc};

/// Whole days elapsed from `since` to `now`, floored and never negative.
///
/// Timestamps in the future (clock skew between us and the upstream) count
/// as zero days.
#[must_use]
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - since).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
