//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::service::OrdersService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TrackerConfig,
    orders: OrdersService,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Configuration` if the Shopify client cannot be
    /// constructed.
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        let orders = OrdersService::new(&config.shopify, config.pipeline)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, orders }),
        })
    }

    #[must_use]
    pub fn orders(&self) -> &OrdersService {
        &self.inner.orders
    }

    #[must_use]
    pub fn dev_mode(&self) -> bool {
        self.inner.config.dev_mode
    }
}
