//! Tracker configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//!
//! ## Credential
//! - `SHOPIFY_ACCESS_TOKEN` - Admin API access token. The server starts
//!   without it, but every order operation then fails with a configuration
//!   error before touching the network.
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2024-10)
//! - `SHOPIFY_BASE_URL` - Override for `https://{SHOPIFY_STORE}`
//! - `TRACKER_HOST` - Bind address (default: 127.0.0.1)
//! - `TRACKER_PORT` - Listen port (default: 3001)
//! - `TRACKER_LOOKBACK_DAYS` - Listing window in days (default: 60)
//! - `TRACKER_MAX_PAGES` - Page ceiling per listing (default: 10)
//! - `TRACKER_PAGE_SIZE` - Orders per page (default and max: 250)
//! - `TRACKER_FETCH_POLICY` - `abort` or `partial` (default: abort)
//! - `TRACKER_REQUEST_TIMEOUT_SECS` - Upstream request timeout (default: 30)
//! - `TRACKER_DEV_MODE` - Attach backtraces to error responses
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::fetcher::FetchErrorPolicy;

const DEFAULT_API_VERSION: &str = "2024-10";

/// Shopify rejects `limit` above this.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Upper bound accepted for per-request page ceilings.
pub const MAX_PAGES_CEILING: u32 = 50;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Tracker application configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin REST API configuration
    pub shopify: ShopifyConfig,
    /// Listing defaults
    pub pipeline: PipelineConfig,
    /// Include backtraces in error responses
    pub dev_mode: bool,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin REST API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Shopify store domain
    pub store: String,
    /// Admin API version (e.g., 2024-10)
    pub api_version: String,
    /// Scheme and host that `/admin/api/...` paths are appended to
    pub base_url: String,
    /// Admin API access token, if configured
    pub access_token: Option<SecretString>,
    /// Per-request timeout for upstream calls
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ShopifyConfig {
    /// Configuration for a store with the default API version and timeout.
    #[must_use]
    pub fn new(store: impl Into<String>, access_token: Option<SecretString>) -> Self {
        let store = store.into();
        Self {
            base_url: format!("https://{store}"),
            store,
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Point the client at a different host (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The access token if one is set and non-blank.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.access_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
    }

    fn from_env() -> Result<Self, ConfigError> {
        let store = get_required_env("SHOPIFY_STORE")?;
        let access_token = get_optional_env("SHOPIFY_ACCESS_TOKEN")
            .map(|token| {
                validate_token(&token, "SHOPIFY_ACCESS_TOKEN")?;
                Ok(SecretString::from(token))
            })
            .transpose()?;
        let timeout_secs: u64 = parse_env("TRACKER_REQUEST_TIMEOUT_SECS", "30")?;

        let mut config = Self::new(store, access_token);
        config.api_version = get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION);
        config.request_timeout = Duration::from_secs(timeout_secs.max(1));
        if let Some(base_url) = get_optional_env("SHOPIFY_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }
}

/// Defaults for the active-orders listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// How far back the listing looks, in days
    pub lookback_days: u32,
    /// Hard ceiling on pages fetched per listing
    pub max_pages: u32,
    /// Orders requested per page
    pub page_size: u32,
    /// What to do when a page fetch fails midway
    pub on_error: FetchErrorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            max_pages: 10,
            page_size: MAX_PAGE_SIZE,
            on_error: FetchErrorPolicy::Abort,
        }
    }
}

impl PipelineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let lookback_days: u32 = parse_env("TRACKER_LOOKBACK_DAYS", "60")?;
        let max_pages: u32 = parse_env("TRACKER_MAX_PAGES", "10")?;
        let page_size: u32 = parse_env("TRACKER_PAGE_SIZE", "250")?;
        let on_error: FetchErrorPolicy = parse_env("TRACKER_FETCH_POLICY", "abort")?;

        if lookback_days == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TRACKER_LOOKBACK_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_PAGES_CEILING).contains(&max_pages) {
            return Err(ConfigError::InvalidEnvVar(
                "TRACKER_MAX_PAGES".to_string(),
                format!("must be between 1 and {MAX_PAGES_CEILING}"),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::InvalidEnvVar(
                "TRACKER_PAGE_SIZE".to_string(),
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        Ok(Self {
            lookback_days,
            max_pages,
            page_size,
            on_error,
        })
    }
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the access token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("TRACKER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRACKER_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TRACKER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRACKER_PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyConfig::from_env()?;
        let pipeline = PipelineConfig::from_env()?;
        let dev_mode = get_optional_env("TRACKER_DEV_MODE").is_some_and(|v| is_truthy(&v));
        let json_logs =
            get_optional_env("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            shopify,
            pipeline,
            dev_mode,
            json_logs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Configuration for a store with every other setting at its default.
    #[must_use]
    pub fn new(shopify: ShopifyConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            shopify,
            pipeline: PipelineConfig::default(),
            dev_mode: false,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Reject tokens that were obviously copied from a template.
fn validate_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = token.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token_placeholder() {
        let result = validate_token("your-access-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_token_changeme() {
        assert!(validate_token("CHANGEME", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_token_valid() {
        assert!(validate_token("shpat_4f9c1e0b7a2d83c56e1f0a9b", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_blank_token_is_absent() {
        let config = ShopifyConfig::new("test.myshopify.com", Some(SecretString::from("  ")));
        assert!(config.token().is_none());

        let config = ShopifyConfig::new("test.myshopify.com", None);
        assert!(config.token().is_none());
    }

    #[test]
    fn test_base_url_defaults_to_store() {
        let config = ShopifyConfig::new("test.myshopify.com", None);
        assert_eq!(config.base_url, "https://test.myshopify.com");

        let config = config.with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" yes "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }

    #[test]
    fn test_pipeline_defaults() {
        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.lookback_days, 60);
        assert_eq!(pipeline.max_pages, 10);
        assert_eq!(pipeline.page_size, 250);
        assert_eq!(pipeline.on_error, FetchErrorPolicy::Abort);
    }

    #[test]
    fn test_socket_addr() {
        let config = TrackerConfig::new(ShopifyConfig::new("test.myshopify.com", None));
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_shopify_config_debug_redacts_token() {
        let config = ShopifyConfig::new(
            "test.myshopify.com",
            Some(SecretString::from("shpat_super_secret_value")),
        );

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("test.myshopify.com"));
        assert!(debug_output.contains("2024-10"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_super_secret_value"));
    }
}
