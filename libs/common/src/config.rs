//! Client configuration
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `retrorewind.toml` in the working directory, then `RETROREWIND_*`
//! environment variables.

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ClientError, ClientResult};

/// Default backend address used by local development setups
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Backend connection settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, `retrorewind.toml` and the environment
    ///
    /// # Environment Variables
    /// - `RETROREWIND_BASE_URL`: backend base URL (default: "http://127.0.0.1:5000")
    /// - `RETROREWIND_TIMEOUT_SECS`: request timeout in seconds (default: 15)
    pub fn from_env() -> ClientResult<Self> {
        Self::load(Some("retrorewind"))
    }

    /// Load configuration, optionally layering a config file by base name
    pub fn load(file: Option<&str>) -> ClientResult<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)
            .and_then(|b| b.set_default("timeout_secs", DEFAULT_TIMEOUT_SECS))
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        if let Some(name) = file {
            builder = builder.add_source(File::with_name(name).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("RETROREWIND").try_parsing(true))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let config: ClientConfig = settings
            .try_deserialize()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        config.validated()
    }

    /// Normalise and check the loaded values
    pub fn validated(mut self) -> ClientResult<Self> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(ClientError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.base_url = trimmed;
        Ok(self)
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_client_config_defaults() {
        // SAFETY: serialised with the other env-touching tests
        unsafe {
            std::env::remove_var("RETROREWIND_BASE_URL");
            std::env::remove_var("RETROREWIND_TIMEOUT_SECS");
        }

        let config = ClientConfig::load(None).expect("Failed to load client config");
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    #[serial]
    fn test_client_config_from_environment() {
        // SAFETY: serialised with the other env-touching tests
        unsafe {
            std::env::set_var("RETROREWIND_BASE_URL", "https://api.example.test/");
            std::env::set_var("RETROREWIND_TIMEOUT_SECS", "30");
        }

        let config = ClientConfig::load(None).expect("Failed to load client config");

        unsafe {
            std::env::remove_var("RETROREWIND_BASE_URL");
            std::env::remove_var("RETROREWIND_TIMEOUT_SECS");
        }

        assert_eq!(config.base_url, "https://api.example.test");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 0,
        };
        assert!(matches!(
            config.validated(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_blank_base_url() {
        let config = ClientConfig {
            base_url: " / ".to_string(),
            timeout_secs: 5,
        };
        assert!(config.validated().is_err());
    }
}
