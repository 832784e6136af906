//! Order listing and detail commands.
//!
//! # Environment Variables
//!
//! Same as the server: `SHOPIFY_STORE`, `SHOPIFY_ACCESS_TOKEN`, and the
//! optional `TRACKER_*` settings.

use std::io::Write;
use std::time::Duration;

use prazo_server::config::{ConfigError, TrackerConfig};
use prazo_server::envelope::{ErrorEnvelope, OrderEnvelope, OrdersEnvelope};
use prazo_server::fetcher::FetchErrorPolicy;
use prazo_server::service::{ListRequest, OrdersService};
use prazo_server::TrackerError;
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

/// Errors that can occur while running an order command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operation failed; the error envelope was already printed.
    #[error("{0}")]
    Tracker(#[from] TrackerError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for `prazo orders`.
#[derive(Debug, Default)]
pub struct ListArgs {
    pub days: Option<u32>,
    pub max_pages: Option<u32>,
    pub partial: bool,
    /// Explicit policy; overrides `partial` and the configured default.
    pub on_error: Option<FetchErrorPolicy>,
    pub deadline_secs: Option<u64>,
}

impl ListArgs {
    fn into_request(self) -> ListRequest {
        ListRequest {
            lookback_days: self.days,
            max_pages: self.max_pages,
            on_error: self
                .on_error
                .or_else(|| self.partial.then_some(FetchErrorPolicy::ReturnPartial)),
            deadline: self
                .deadline_secs
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        }
    }
}

/// List active orders and print the envelope.
pub async fn list(args: ListArgs) -> Result<(), CommandError> {
    let service = service()?;

    match service.list_active_orders(args.into_request()).await {
        Ok(report) => {
            let envelope = OrdersEnvelope::from(report);
            tracing::info!(
                active = envelope.orders.len(),
                pages = envelope.pages_processed,
                "Listing complete"
            );
            print_json(&envelope)
        }
        Err(e) => fail(e),
    }
}

/// Fetch one order and print the envelope.
pub async fn detail(id: &str) -> Result<(), CommandError> {
    let service = service()?;

    match service.get_order_detail(id).await {
        Ok(report) => print_json(&OrderEnvelope::from(report)),
        Err(e) => fail(e),
    }
}

fn service() -> Result<OrdersService, CommandError> {
    let config = TrackerConfig::from_env()?;
    Ok(OrdersService::new(&config.shopify, config.pipeline)?)
}

/// Print the error envelope, then report the failure for the exit code.
fn fail(error: TrackerError) -> Result<(), CommandError> {
    print_json(&ErrorEnvelope::new(&error, None))?;
    Err(error.into())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
