//! # Region Service Configuration
//!
//! Where the region classification endpoint lives and how long to wait for it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FULFIL_REGION_ENDPOINT=https://regions.internal/                   │
//! │     FULFIL_REGION_TIMEOUT_SECS=5                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/fulfil/shipping.toml (Linux)                             │
//! │     ~/Library/Application Support/com.fulfil.fulfil/shipping.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     hosted region endpoint, 10 second timeout                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # shipping.toml
//! [region_service]
//! endpoint = "https://regions.example.com/"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ShippingError, ShippingResult};

/// Hosted region classification endpoint.
pub const DEFAULT_REGION_ENDPOINT: &str =
    "https://npovmrfcyzu2gu42pmqa7zce6a0zikbf.lambda-url.eu-west-2.on.aws/";

const ENDPOINT_ENV: &str = "FULFIL_REGION_ENDPOINT";
const TIMEOUT_ENV: &str = "FULFIL_REGION_TIMEOUT_SECS";

// =============================================================================
// Region Service Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionServiceConfig {
    /// Base URL; the country is appended as the `country` query parameter.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_REGION_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RegionServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RegionServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed endpoint URL.
    pub fn endpoint_url(&self) -> ShippingResult<Url> {
        Ok(Url::parse(&self.endpoint)?)
    }
}

// =============================================================================
// File Layout
// =============================================================================

/// Top-level shape of `shipping.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingConfig {
    #[serde(default)]
    pub region_service: RegionServiceConfig,
}

impl ShippingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (shipping.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ShippingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading shipping config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load shipping config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ShippingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ShippingError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ShippingError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ShippingError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Shipping config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ShippingResult<()> {
        let service = &self.region_service;

        let url = service.endpoint_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ShippingError::InvalidEndpoint(format!(
                "Region endpoint must start with http:// or https://, got: {}",
                service.endpoint
            )));
        }

        if service.timeout_secs == 0 {
            return Err(ShippingError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            debug!(endpoint = %endpoint, "Overriding region endpoint from environment");
            self.region_service.endpoint = endpoint;
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            match timeout.parse::<u64>() {
                Ok(secs) => {
                    debug!(timeout_secs = secs, "Overriding region timeout from environment");
                    self.region_service.timeout_secs = secs;
                }
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric region timeout"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fulfil", "fulfil")
            .map(|dirs| dirs.config_dir().join("shipping.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ShippingConfig::default();
        assert_eq!(config.region_service.endpoint, DEFAULT_REGION_ENDPOINT);
        assert_eq!(config.region_service.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ShippingConfig::default();

        config.region_service.endpoint = "ftp://regions.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ShippingError::InvalidEndpoint(_))
        ));

        config.region_service.endpoint = "definitely not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ShippingError::InvalidEndpoint(_))
        ));

        config.region_service.endpoint = "http://localhost:8080/region".to_string();
        config.region_service.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ShippingError::InvalidConfig(_))
        ));

        config.region_service.timeout_secs = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let mut config = ShippingConfig::default();
        config.apply_overrides(env(&[
            (ENDPOINT_ENV, "https://regions.example.com/"),
            (TIMEOUT_ENV, "4"),
        ]));

        assert_eq!(config.region_service.endpoint, "https://regions.example.com/");
        assert_eq!(config.region_service.timeout_secs, 4);
    }

    #[test]
    fn test_bad_timeout_override_ignored() {
        let mut config = ShippingConfig::default();
        config.apply_overrides(env(&[(TIMEOUT_ENV, "soon")]));
        assert_eq!(config.region_service.timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ShippingConfig =
            toml::from_str("[region_service]\ntimeout_secs = 2\n").unwrap();
        assert_eq!(config.region_service.endpoint, DEFAULT_REGION_ENDPOINT);
        assert_eq!(config.region_service.timeout_secs, 2);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shipping.toml");

        let mut config = ShippingConfig::default();
        config.region_service.endpoint = "http://127.0.0.1:9000/".to_string();
        config.region_service.timeout_secs = 7;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[region_service]"));

        let loaded: ShippingConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipping.toml");
        std::fs::write(&path, "[region_service\nendpoint = ").unwrap();

        let result = ShippingConfig::load(Some(path.clone()));
        assert!(matches!(result, Err(ShippingError::ConfigLoadFailed(_))));

        let fallback = ShippingConfig::load_or_default(Some(path));
        assert_eq!(fallback.region_service.timeout_secs, 10);
    }
}
