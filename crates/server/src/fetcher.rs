//! Sequential page fetching for the orders listing.
//!
//! The loop is generic over [`OrderSource`] so it can be driven by the real
//! Shopify client or by an in-memory source in tests.

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use prazo_core::RawOrder;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::shopify::{OrderPage, ShopifyError};

/// A request for one page of orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// First page: filter by creation date.
    Initial {
        created_at_min: DateTime<Utc>,
        limit: u32,
    },
    /// Later pages: the cursor from the previous response.
    Continue { page_info: String, limit: u32 },
}

/// Anything that can serve pages of the orders listing.
pub trait OrderSource {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<OrderPage, ShopifyError>> + Send;
}

/// What to do when a page fails after earlier pages succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// Discard fetched pages and return the error.
    #[default]
    Abort,
    /// Keep fetched pages and record the failure in the stop reason.
    #[serde(rename = "partial", alias = "return_partial")]
    ReturnPartial,
}

impl FromStr for FetchErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "partial" | "return_partial" => Ok(Self::ReturnPartial),
            other => Err(format!("unknown fetch policy '{other}' (expected abort or partial)")),
        }
    }
}

/// Parameters for one listing fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub lookback_days: u32,
    pub max_pages: u32,
    pub page_size: u32,
    pub on_error: FetchErrorPolicy,
    /// Give up on any call still pending at this instant.
    pub deadline: Option<Instant>,
}

/// Why the fetch loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The last page had no next cursor.
    Exhausted,
    /// A page came back with zero orders.
    EmptyPage,
    /// The page ceiling was reached.
    PageLimit,
    /// A page failed and the partial policy kept earlier pages.
    Failed { message: String },
}

impl StopReason {
    /// Whether the result may be missing orders because of an error.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Every order fetched, in page order.
#[derive(Debug)]
pub struct FetchOutcome {
    pub orders: Vec<RawOrder>,
    pub pages_processed: u32,
    pub stop: StopReason,
}

/// Fetch orders created within the lookback window.
///
/// Pages are fetched one at a time until there is no next cursor, a page is
/// empty, or `max_pages` pages have been processed.
///
/// # Errors
///
/// With [`FetchErrorPolicy::Abort`], returns the first page error (including
/// [`ShopifyError::Cancelled`] once the deadline passes).
pub async fn fetch_orders<S>(
    source: &S,
    options: &FetchOptions,
    now: DateTime<Utc>,
) -> Result<FetchOutcome, ShopifyError>
where
    S: OrderSource + Sync,
{
    let created_at_min = now - Duration::days(i64::from(options.lookback_days));
    let mut request = PageRequest::Initial {
        created_at_min,
        limit: options.page_size,
    };
    let mut orders = Vec::new();
    let mut pages_processed = 0;

    let stop = loop {
        if pages_processed >= options.max_pages {
            tracing::info!(pages_processed, "Page ceiling reached");
            break StopReason::PageLimit;
        }

        let page = match fetch_with_deadline(source, &request, options.deadline).await {
            Ok(page) => page,
            Err(error) => match options.on_error {
                FetchErrorPolicy::Abort => return Err(error),
                FetchErrorPolicy::ReturnPartial => {
                    tracing::warn!(
                        error = %error,
                        pages_processed,
                        orders = orders.len(),
                        "Page fetch failed, returning partial results"
                    );
                    break StopReason::Failed {
                        message: error.to_string(),
                    };
                }
            },
        };
        pages_processed += 1;

        if page.orders.is_empty() {
            break StopReason::EmptyPage;
        }
        orders.extend(page.orders);

        match page.next_page_info {
            Some(page_info) => {
                request = PageRequest::Continue {
                    page_info,
                    limit: options.page_size,
                };
            }
            None => break StopReason::Exhausted,
        }
    };

    tracing::info!(
        pages_processed,
        orders = orders.len(),
        stop = ?stop,
        "Order fetch finished"
    );

    Ok(FetchOutcome {
        orders,
        pages_processed,
        stop,
    })
}

async fn fetch_with_deadline<S>(
    source: &S,
    request: &PageRequest,
    deadline: Option<Instant>,
) -> Result<OrderPage, ShopifyError>
where
    S: OrderSource + Sync,
{
    let Some(deadline) = deadline else {
        return source.fetch_page(request).await;
    };

    if Instant::now() >= deadline {
        return Err(ShopifyError::Cancelled);
    }

    tokio::time::timeout_at(deadline, source.fetch_page(request))
        .await
        .map_err(|_| ShopifyError::Cancelled)?
}
