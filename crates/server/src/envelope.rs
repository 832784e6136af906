//! JSON envelopes shared by the HTTP API and the CLI.

use prazo_core::{ClassifiedOrder, OrderDetail, Stats};
use serde::Serialize;

use crate::error::{ErrorKind, TrackerError};
use crate::fetcher::StopReason;
use crate::service::{ActiveOrdersReport, OrderDetailReport};

/// `{"success": true, "orders": [...], "stats": {...}, "pagesProcessed": n}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersEnvelope {
    pub success: bool,
    pub orders: Vec<ClassifiedOrder>,
    pub stats: Stats,
    pub pages_processed: u32,
    pub stop: StopReason,
    /// Present when a page failed and earlier pages were kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<ActiveOrdersReport> for OrdersEnvelope {
    fn from(report: ActiveOrdersReport) -> Self {
        let warning = match &report.stop {
            StopReason::Failed { message } => {
                Some(format!("partial results, fetch stopped early: {message}"))
            }
            _ => None,
        };

        Self {
            success: true,
            orders: report.active.orders,
            stats: report.active.stats,
            pages_processed: report.pages_processed,
            stop: report.stop,
            warning,
        }
    }
}

/// `{"success": true, "order": {...}}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: OrderDetail,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<OrderDetailReport> for OrderEnvelope {
    fn from(report: OrderDetailReport) -> Self {
        let warnings = report.warnings();
        Self {
            success: true,
            order: report.order,
            warnings,
        }
    }
}

/// `{"success": false, "error": "<kind>", "message": "...", "details": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(error: &TrackerError, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.kind(),
            message: error.public_message(),
            details,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use prazo_core::classify_active;
    use serde_json::json;

    #[test]
    fn test_error_envelope_shape() {
        let err = TrackerError::MalformedInput("order id is not numeric: abc".to_string());
        let value = serde_json::to_value(ErrorEnvelope::new(&err, None)).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "malformed_input",
                "message": "Malformed input: order id is not numeric: abc"
            })
        );
    }

    #[test]
    fn test_orders_envelope_flags_partial_results() {
        let report = ActiveOrdersReport {
            active: classify_active(Vec::new(), Utc::now()),
            pages_processed: 1,
            stop: StopReason::Failed {
                message: "Request timed out".to_string(),
            },
        };

        let value = serde_json::to_value(OrdersEnvelope::from(report)).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["pagesProcessed"], json!(1));
        assert_eq!(value["stop"]["reason"], json!("failed"));
        assert!(value["warning"].as_str().unwrap().contains("timed out"));
    }

    #[test]
    fn test_orders_envelope_omits_warning_when_complete() {
        let report = ActiveOrdersReport {
            active: classify_active(Vec::new(), Utc::now()),
            pages_processed: 3,
            stop: StopReason::Exhausted,
        };

        let value = serde_json::to_value(OrdersEnvelope::from(report)).unwrap();
        assert!(value.get("warning").is_none());
        assert_eq!(value["stop"], json!({"reason": "exhausted"}));
    }
}
