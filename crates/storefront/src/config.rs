//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Origin of the storefront backend (e.g., <http://localhost:8000>)
//!
//! ## Optional
//! - `SEARCH_DEBOUNCE_MS` - Quiet period before a live search fires (default: 300)
//! - `SEARCH_MIN_QUERY_LENGTH` - Shortest query that triggers a search (default: 2)
//! - `NOTIFICATION_DISPLAY_MS` - How long a notification stays visible (default: 3000)
//! - `NOTIFICATION_FADE_MS` - Fade-out duration before removal (default: 300)
//! - `PLACEHOLDER_IMAGE_URL` - Fallback thumbnail (default: /static/images/placeholder.svg)
//! - `STOREFRONT_CSRF_TOKEN` - CSRF token to seed into the cookie jar
//! - `STOREFRONT_SESSION_ID` - Backend session cookie, so commands reuse one cart
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default thumbnail shown when a search result has no usable image.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin all endpoint paths are resolved against
    pub base_url: Url,
    /// Live search tuning
    pub search: SearchConfig,
    /// Notification timing
    pub notifications: NotificationConfig,
    /// CSRF token to seed as the `csrftoken` cookie
    pub csrf_token: Option<SecretString>,
    /// Session id to seed as the `sessionid` cookie
    pub session_id: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Live search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a request is sent
    pub debounce: Duration,
    /// Minimum trimmed query length, in characters
    pub min_query_length: usize,
    /// Thumbnail used for results without an image, or whose image fails to load
    pub placeholder_image: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_length: 2,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Notification timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    /// How long a notification is fully visible
    pub display: Duration,
    /// Fade-out duration before the element is removed
    pub fade: Duration,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(3000),
            fade: Duration::from_millis(300),
        }
    }
}

impl StorefrontConfig {
    /// Build a configuration with default tuning for the given backend.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            search: SearchConfig::default(),
            notifications: NotificationConfig::default(),
            csrf_token: None,
            session_id: None,
            sentry_dsn: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let search = SearchConfig {
            debounce: get_millis_or_default("SEARCH_DEBOUNCE_MS", 300)?,
            min_query_length: get_parsed_or_default("SEARCH_MIN_QUERY_LENGTH", 2)?,
            placeholder_image: get_env_or_default(
                "PLACEHOLDER_IMAGE_URL",
                DEFAULT_PLACEHOLDER_IMAGE,
            ),
        };

        let notifications = NotificationConfig {
            display: get_millis_or_default("NOTIFICATION_DISPLAY_MS", 3000)?,
            fade: get_millis_or_default("NOTIFICATION_FADE_MS", 300)?,
        };

        Ok(Self {
            base_url,
            search,
            notifications,
            csrf_token: get_optional_env("STOREFRONT_CSRF_TOKEN").map(SecretString::from),
            session_id: get_optional_env("STOREFRONT_SESSION_ID").map(SecretString::from),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn get_parsed_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

/// Parse a millisecond duration from an optional environment variable.
fn get_millis_or_default(key: &str, default_ms: u64) -> Result<Duration, ConfigError> {
    get_parsed_or_default(key, default_ms).map(Duration::from_millis)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
