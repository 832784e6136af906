//! The two order operations: active-orders listing and single-order detail.
//!
//! Both are shared by the HTTP routes and the CLI. The credential is checked
//! before any upstream call, so a missing token never produces network
//! traffic.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use prazo_core::{ActiveOrders, OrderDetail, OrderId, RawOrder, classify_active};
use tokio::time::Instant;
use tracing::instrument;

use crate::config::{MAX_PAGES_CEILING, PipelineConfig, ShopifyConfig};
use crate::error::TrackerError;
use crate::fetcher::{FetchErrorPolicy, FetchOptions, OrderSource, StopReason, fetch_orders};
use crate::shopify::{ShopifyClient, ShopifyError};

/// Value substituted when the customer's order history is unavailable.
pub const DEFAULT_CUSTOMER_ORDERS_COUNT: u64 = 1;

/// Result of a sub-call whose failure must not fail the whole operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort<T> {
    Ok(T),
    /// The call failed and `value` is a substitute.
    Degraded { value: T, cause: String },
}

impl<T> BestEffort<T> {
    /// Keep the success value, or fall back to `default` and log the cause.
    pub fn from_result<E: Display>(result: Result<T, E>, default: T, what: &str) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => {
                tracing::warn!(error = %error, what, "Best-effort lookup failed, using default");
                Self::Degraded {
                    value: default,
                    cause: error.to_string(),
                }
            }
        }
    }

    pub const fn value(&self) -> &T {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => value,
        }
    }

    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The failure that caused degradation, if any.
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { cause, .. } => Some(cause),
        }
    }
}

/// Overrides for one listing call. `None` fields use the configured defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRequest {
    pub lookback_days: Option<u32>,
    pub max_pages: Option<u32>,
    pub on_error: Option<FetchErrorPolicy>,
    pub deadline: Option<Instant>,
}

/// Active orders plus how the fetch went.
#[derive(Debug)]
pub struct ActiveOrdersReport {
    pub active: ActiveOrders,
    pub pages_processed: u32,
    pub stop: StopReason,
}

/// A projected order plus the status of its best-effort lookups.
#[derive(Debug)]
pub struct OrderDetailReport {
    pub order: OrderDetail,
    pub customer_orders_count: BestEffort<u64>,
}

impl OrderDetailReport {
    /// Human-readable notes about degraded lookups.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.customer_orders_count
            .cause()
            .map(|cause| format!("customer order history unavailable: {cause}"))
            .into_iter()
            .collect()
    }
}

/// Order operations against one store.
#[derive(Clone)]
pub struct OrdersService {
    /// `None` when no access token is configured.
    client: Option<ShopifyClient>,
    pipeline: PipelineConfig,
}

impl OrdersService {
    /// Build the service. A missing token is not an error here; each
    /// operation reports it instead.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Configuration` if the HTTP client cannot be built.
    pub fn new(shopify: &ShopifyConfig, pipeline: PipelineConfig) -> Result<Self, TrackerError> {
        let client = match ShopifyClient::new(shopify) {
            Ok(client) => Some(client),
            Err(ShopifyError::MissingCredential) => {
                tracing::warn!("SHOPIFY_ACCESS_TOKEN is not set; order operations will fail");
                None
            }
            Err(e) => return Err(TrackerError::Configuration(e.to_string())),
        };

        Ok(Self { client, pipeline })
    }

    fn client(&self) -> Result<&ShopifyClient, TrackerError> {
        self.client
            .as_ref()
            .ok_or_else(|| ShopifyError::MissingCredential.into())
    }

    /// Fetch, filter, classify, sort, and summarize recent orders.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Configuration` without a credential, and
    /// `FetchFailed` or `Cancelled` when fetching fails under the abort policy.
    #[instrument(skip(self))]
    pub async fn list_active_orders(
        &self,
        request: ListRequest,
    ) -> Result<ActiveOrdersReport, TrackerError> {
        let client = self.client()?;
        let options = self.fetch_options(request);
        list_active_orders_from(client, &options, Utc::now()).await
    }

    /// Fetch and project one order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Configuration` without a credential,
    /// `MalformedInput` for an unusable id, `NotFound` when the order does not
    /// exist, and `FetchFailed` for other upstream failures. Customer history
    /// failures are absorbed.
    #[instrument(skip(self))]
    pub async fn get_order_detail(&self, raw_id: &str) -> Result<OrderDetailReport, TrackerError> {
        let client = self.client()?;
        let id: OrderId = raw_id.parse()?;

        let order = client.get_order(id).await?;
        let customer_orders_count = customer_orders_count(client, &order).await;
        let detail = OrderDetail::project(&order, *customer_orders_count.value(), Utc::now());

        Ok(OrderDetailReport {
            order: detail,
            customer_orders_count,
        })
    }

    fn fetch_options(&self, request: ListRequest) -> FetchOptions {
        FetchOptions {
            lookback_days: request
                .lookback_days
                .unwrap_or(self.pipeline.lookback_days)
                .max(1),
            max_pages: request
                .max_pages
                .unwrap_or(self.pipeline.max_pages)
                .clamp(1, MAX_PAGES_CEILING),
            page_size: self.pipeline.page_size,
            on_error: request.on_error.unwrap_or(self.pipeline.on_error),
            deadline: request.deadline,
        }
    }
}

/// The listing pipeline over any order source.
///
/// # Errors
///
/// Propagates fetch errors under the abort policy.
pub async fn list_active_orders_from<S>(
    source: &S,
    options: &FetchOptions,
    now: DateTime<Utc>,
) -> Result<ActiveOrdersReport, TrackerError>
where
    S: OrderSource + Sync,
{
    let fetched = fetch_orders(source, options, now).await?;
    let active = classify_active(fetched.orders, now);

    tracing::info!(
        fetched = active.stats.total_fetched,
        valid = active.stats.valid,
        delivered = active.stats.delivered_filtered,
        active = active.stats.active,
        late = active.stats.late,
        "Active orders classified"
    );

    Ok(ActiveOrdersReport {
        active,
        pages_processed: fetched.pages_processed,
        stop: fetched.stop,
    })
}

async fn customer_orders_count(client: &ShopifyClient, order: &RawOrder) -> BestEffort<u64> {
    let Some(customer_id) = order.customer.as_ref().and_then(|c| c.id) else {
        return BestEffort::Ok(DEFAULT_CUSTOMER_ORDERS_COUNT);
    };

    BestEffort::from_result(
        client.get_customer_orders_count(customer_id).await,
        DEFAULT_CUSTOMER_ORDERS_COUNT,
        "customer orders count",
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service_without_token() -> OrdersService {
        let shopify = ShopifyConfig::new("test.myshopify.com", None);
        OrdersService::new(&shopify, PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_best_effort_ok() {
        let result: BestEffort<u64> = BestEffort::from_result(Ok::<_, String>(7), 1, "count");
        assert_eq!(*result.value(), 7);
        assert!(!result.is_degraded());
        assert_eq!(result.cause(), None);
    }

    #[test]
    fn test_best_effort_degraded() {
        let result = BestEffort::from_result(Err::<u64, _>("boom"), 1, "count");
        assert!(result.is_degraded());
        assert_eq!(result.cause(), Some("boom"));
        assert_eq!(*result.value(), 1);
    }

    #[tokio::test]
    async fn test_missing_token_fails_listing_with_configuration_error() {
        let err = service_without_token()
            .list_active_orders(ListRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_missing_token_checked_before_id() {
        let err = service_without_token()
            .get_order_detail("not-a-number")
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Configuration(_)));
    }

    #[test]
    fn test_fetch_options_apply_overrides_and_bounds() {
        let service = service_without_token();

        let defaults = service.fetch_options(ListRequest::default());
        assert_eq!(defaults.lookback_days, 60);
        assert_eq!(defaults.max_pages, 10);
        assert_eq!(defaults.on_error, FetchErrorPolicy::Abort);

        let overridden = service.fetch_options(ListRequest {
            lookback_days: Some(0),
            max_pages: Some(500),
            on_error: Some(FetchErrorPolicy::ReturnPartial),
            deadline: None,
        });
        assert_eq!(overridden.lookback_days, 1);
        assert_eq!(overridden.max_pages, MAX_PAGES_CEILING);
        assert_eq!(overridden.on_error, FetchErrorPolicy::ReturnPartial);
    }

    #[test]
    fn test_warnings_mention_degraded_history() {
        let report = OrderDetailReport {
            order: OrderDetail::project(&RawOrder::default(), 1, Utc::now()),
            customer_orders_count: BestEffort::Degraded {
                value: 1,
                cause: "Shopify returned 500: oops".to_string(),
            },
        };
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].contains("500"));
    }
}
