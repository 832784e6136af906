//! Shopify Admin REST API client.

use std::sync::Arc;

use prazo_core::{CustomerId, OrderId, RawOrder};
use reqwest::header::LINK;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;
use url::Url;

use super::ShopifyError;
use super::pagination::next_page_info;
use crate::config::ShopifyConfig;
use crate::fetcher::{OrderSource, PageRequest};

/// Authentication header for Admin API access tokens.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin REST API client.
///
/// Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone)]
pub struct ShopifyClient {
    inner: Arc<ShopifyClientInner>,
}

struct ShopifyClientInner {
    client: reqwest::Client,
    /// `{base_url}/admin/api/{version}`
    api_root: String,
    access_token: SecretString,
}

/// One page of the orders listing.
#[derive(Debug, Default)]
pub struct OrderPage {
    pub orders: Vec<RawOrder>,
    /// Cursor for the following page, absent on the last one.
    pub next_page_info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    #[serde(default)]
    orders: Vec<RawOrder>,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    order: RawOrder,
}

#[derive(Debug, Deserialize)]
struct CustomerResponse {
    customer: CustomerRecord,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    orders_count: Option<u64>,
}

impl ShopifyClient {
    /// Create a client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::MissingCredential` if no access token is set.
    /// Returns `ShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let access_token = config
            .token()
            .cloned()
            .ok_or(ShopifyError::MissingCredential)?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ShopifyClientInner {
                client,
                api_root: format!(
                    "{}/admin/api/{}",
                    config.base_url.trim_end_matches('/'),
                    config.api_version
                ),
                access_token,
            }),
        })
    }

    /// Fetch one page of the orders listing.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on transport failure, timeout, non-2xx status,
    /// or an unparseable body.
    #[instrument(skip(self), fields(cursor = matches!(request, PageRequest::Continue { .. })))]
    pub async fn get_orders_page(&self, request: &PageRequest) -> Result<OrderPage, ShopifyError> {
        let query: Vec<(&str, String)> = match request {
            PageRequest::Initial {
                created_at_min,
                limit,
            } => vec![
                ("status", "any".to_string()),
                ("limit", limit.to_string()),
                ("created_at_min", created_at_min.to_rfc3339()),
            ],
            // Shopify rejects any filter next to page_info.
            PageRequest::Continue { page_info, limit } => vec![
                ("limit", limit.to_string()),
                ("page_info", page_info.clone()),
            ],
        };

        let response = self.get("orders.json", &query).await?;
        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_info);

        let body: OrdersResponse = read_json(response).await?;
        tracing::debug!(
            orders = body.orders.len(),
            has_next = next.is_some(),
            "Fetched orders page"
        );

        Ok(OrderPage {
            orders: body.orders,
            next_page_info: next,
        })
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<RawOrder, ShopifyError> {
        let response = self
            .get(&format!("orders/{id}.json"), &[])
            .await
            .map_err(|e| not_found_as(e, || format!("order {id}")))?;
        let body: OrderResponse = read_json(response).await?;
        Ok(body.order)
    }

    /// Fetch how many orders a customer has placed.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` on any failure, including a customer record
    /// without `orders_count`.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get_customer_orders_count(&self, id: CustomerId) -> Result<u64, ShopifyError> {
        let response = self
            .get(&format!("customers/{id}.json"), &[])
            .await
            .map_err(|e| not_found_as(e, || format!("customer {id}")))?;
        let body: CustomerResponse = read_json(response).await?;
        body.customer.orders_count.ok_or_else(|| {
            ShopifyError::UnexpectedResponse("customer record has no orders_count".to_string())
        })
    }

    /// Send an authenticated GET and check the status.
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ShopifyError> {
        let mut url = Url::parse(&format!("{}/{path}", self.inner.api_root))
            .map_err(|e| ShopifyError::UnexpectedResponse(format!("invalid request URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let response = self
            .inner
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .map_or(2, parse_retry_after);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), path, "Shopify request failed");
        Err(ShopifyError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl OrderSource for ShopifyClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<OrderPage, ShopifyError> {
        self.get_orders_page(request).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ShopifyError> {
    let body = response.text().await.map_err(map_transport_error)?;
    Ok(serde_json::from_str(&body)?)
}

fn map_transport_error(error: reqwest::Error) -> ShopifyError {
    if error.is_timeout() {
        ShopifyError::Timeout
    } else {
        ShopifyError::Http(error)
    }
}

/// Shopify sends fractional seconds (`Retry-After: 2.0`).
fn parse_retry_after(value: &str) -> u64 {
    value.trim().parse::<f64>().map_or(2, |secs| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped non-negative
        let secs = secs.ceil().max(0.0) as u64;
        secs
    })
}

fn not_found_as(error: ShopifyError, what: impl FnOnce() -> String) -> ShopifyError {
    match error {
        ShopifyError::Status { status: 404, .. } => ShopifyError::NotFound(what()),
        other => other,
    }
}
