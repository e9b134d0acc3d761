//! # Shipping Error Types
//!
//! Errors raised while setting up the region service client.
//!
//! Lookup failures themselves are `fulfil_core::LookupError`; they belong to
//! the order flow and never pass through this type.

use thiserror::Error;

/// Result type alias for fulfil-shipping setup operations.
pub type ShippingResult<T> = Result<T, ShippingError>;

#[derive(Debug, Error)]
pub enum ShippingError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid region service configuration.
    #[error("Invalid shipping configuration: {0}")]
    InvalidConfig(String),

    /// Region endpoint is not a usable http(s) URL.
    #[error("Invalid region endpoint: {0}")]
    InvalidEndpoint(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Client Errors
    // =========================================================================
    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

// =============================================================================
// Conversions
// =============================================================================

impl From<std::io::Error> for ShippingError {
    fn from(err: std::io::Error) -> Self {
        ShippingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ShippingError {
    fn from(err: toml::de::Error) -> Self {
        ShippingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ShippingError {
    fn from(err: toml::ser::Error) -> Self {
        ShippingError::ConfigSaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for ShippingError {
    fn from(err: url::ParseError) -> Self {
        ShippingError::InvalidEndpoint(err.to_string())
    }
}

impl From<reqwest::Error> for ShippingError {
    fn from(err: reqwest::Error) -> Self {
        ShippingError::ClientSetup(err.to_string())
    }
}

impl ShippingError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ShippingError::InvalidConfig(_)
                | ShippingError::InvalidEndpoint(_)
                | ShippingError::ConfigLoadFailed(_)
                | ShippingError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_error_is_endpoint_error() {
        let err: ShippingError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ShippingError::InvalidEndpoint(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_client_setup_is_not_config_error() {
        let err = ShippingError::ClientSetup("tls backend unavailable".into());
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("tls backend unavailable"));
    }
}
