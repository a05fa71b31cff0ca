//! Unified error handling for the storefront client.
//!
//! Controllers never surface these to their callers: failures are logged
//! through `tracing` and, where the storefront shows one, turned into a
//! notification. The types exist so the layers below controllers can use `?`.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors from talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response body was read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A header value could not be encoded.
    #[error("Invalid header value for {0}")]
    InvalidHeader(String),

    /// An endpoint path could not be resolved against the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_storefront_error() {
        let err = StorefrontError::from(ConfigError::MissingEnvVar(
            "STOREFRONT_BASE_URL".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Config error: Missing environment variable: STOREFRONT_BASE_URL"
        );
    }

    #[test]
    fn test_parse_error_wraps_into_storefront_error() {
        let parse = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = StorefrontError::from(ApiError::from(parse));
        assert!(err.to_string().starts_with("API error: JSON parse error:"));
    }
}
