//! Aggregate counts over the active-orders collection.

use serde::Serialize;

use crate::classify::ClassifiedOrder;
use crate::urgency::UrgencyLevel;

/// Order counts observed before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineCounts {
    pub total_fetched: usize,
    pub valid: usize,
    pub delivered_filtered: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UrgencyCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub normal: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBuckets {
    pub up_to_7_days: usize,
    pub up_to_15_days: usize,
    pub up_to_30_days: usize,
    pub over_30_days: usize,
}

/// Summary returned alongside the active orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_fetched: usize,
    pub valid: usize,
    pub delivered_filtered: usize,
    pub active: usize,
    pub by_urgency: UrgencyCounts,
    pub with_tracking: usize,
    pub without_tracking: usize,
    pub by_age: AgeBuckets,
    pub late: usize,
    pub late_percentage: f64,
    pub tracking_percentage: f64,
}

impl Stats {
    /// Reduce the active orders plus the upstream counts into a summary.
    #[must_use]
    pub fn aggregate(counts: PipelineCounts, active: &[ClassifiedOrder]) -> Self {
        let mut stats = Self {
            total_fetched: counts.total_fetched,
            valid: counts.valid,
            delivered_filtered: counts.delivered_filtered,
            active: active.len(),
            ..Self::default()
        };

        for order in active {
            match order.urgency_level {
                UrgencyLevel::Critical => stats.by_urgency.critical += 1,
                UrgencyLevel::High => stats.by_urgency.high += 1,
                UrgencyLevel::Medium => stats.by_urgency.medium += 1,
                UrgencyLevel::Normal => stats.by_urgency.normal += 1,
                UrgencyLevel::Delivered => {}
            }

            if order.has_tracking {
                stats.with_tracking += 1;
            } else {
                stats.without_tracking += 1;
            }

            match order.days_since_order {
                0..=7 => stats.by_age.up_to_7_days += 1,
                8..=15 => stats.by_age.up_to_15_days += 1,
                16..=30 => stats.by_age.up_to_30_days += 1,
                _ => stats.by_age.over_30_days += 1,
            }

            if order.is_late {
                stats.late += 1;
            }
        }

        stats.late_percentage = percentage(stats.late, stats.active);
        stats.tracking_percentage = percentage(stats.with_tracking, stats.active);
        stats
    }
}

/// `count / total * 100`, rounded to one decimal; zero when `total` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
