//! Order listing and detail endpoints.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use crate::config::MAX_PAGES_CEILING;
use crate::envelope::{OrderEnvelope, OrdersEnvelope};
use crate::error::{ApiError, TrackerError};
use crate::fetcher::FetchErrorPolicy;
use crate::service::ListRequest;
use crate::state::AppState;

/// Longest lookback a caller may request.
const MAX_LOOKBACK_DAYS: u32 = 365;

/// Query parameters for `GET /api/orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub days: Option<u32>,
    pub max_pages: Option<u32>,
    pub on_error: Option<FetchErrorPolicy>,
}

impl ListQuery {
    fn into_request(self) -> Result<ListRequest, TrackerError> {
        if let Some(days) = self.days
            && !(1..=MAX_LOOKBACK_DAYS).contains(&days)
        {
            return Err(TrackerError::MalformedInput(format!(
                "days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        if let Some(max_pages) = self.max_pages
            && !(1..=MAX_PAGES_CEILING).contains(&max_pages)
        {
            return Err(TrackerError::MalformedInput(format!(
                "maxPages must be between 1 and {MAX_PAGES_CEILING}"
            )));
        }

        Ok(ListRequest {
            lookback_days: self.days,
            max_pages: self.max_pages,
            on_error: self.on_error,
            deadline: None,
        })
    }
}

/// `GET /api/orders` - active orders, most urgent first.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<OrdersEnvelope>, ApiError> {
    let dev_mode = state.dev_mode();
    let request = query
        .map_err(|rejection| TrackerError::MalformedInput(rejection.body_text()))
        .and_then(|Query(query)| query.into_request())
        .map_err(|e| ApiError::new(e, dev_mode))?;

    let report = state
        .orders()
        .list_active_orders(request)
        .await
        .map_err(|e| ApiError::new(e, dev_mode))?;

    Ok(Json(report.into()))
}

/// `GET /api/orders/{id}` - full detail for one order.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderEnvelope>, ApiError> {
    let report = state
        .orders()
        .get_order_detail(&id)
        .await
        .map_err(|e| ApiError::new(e, state.dev_mode()))?;

    Ok(Json(report.into()))
}
