//! Connector configuration
//!
//! Runtime configuration for the marketplace connector: credentials, API
//! endpoints, HTTP tuning, and environment loading.

use crate::error::{Error, Result};
use crate::http::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Top-Level Connector Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// OAuth2 credentials
    pub credentials: CredentialsConfig,

    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token endpoint URL
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_url() -> String {
    crate::auth::DEFAULT_TOKEN_URL.to_string()
}

impl ConnectorConfig {
    /// Build a config from explicit client credentials
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            credentials: CredentialsConfig {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
            },
            base_url: default_base_url(),
            token_url: default_token_url(),
            http: HttpConfig::default(),
        }
    }

    /// Load credentials from `AVITO_CLIENT_ID` / `AVITO_CLIENT_SECRET`
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var("AVITO_CLIENT_ID")
            .map_err(|_| Error::missing_field("AVITO_CLIENT_ID"))?;
        let client_secret = std::env::var("AVITO_CLIENT_SECRET")
            .map_err(|_| Error::missing_field("AVITO_CLIENT_SECRET"))?;
        let mut config = Self::new(client_id, client_secret);
        if let Ok(base_url) = std::env::var("AVITO_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials.client_id.is_empty() {
            return Err(Error::missing_field("credentials.client_id"));
        }
        if self.credentials.client_secret.is_empty() {
            return Err(Error::missing_field("credentials.client_secret"));
        }
        url::Url::parse(&self.base_url)?;
        url::Url::parse(&self.token_url)?;
        Ok(())
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// OAuth2 client credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Client ID from the developer profile
    pub client_id: String,

    /// Client secret from the developer profile
    pub client_secret: String,
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Max retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Requests per minute for the client-side rate limiter
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_requests_per_minute() -> u32 {
    600
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl HttpConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = ConnectorConfig::new("id", "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token_url, crate::auth::DEFAULT_TOKEN_URL);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.http.max_retries, 3);
    }

    #[test]
    fn test_config_validate_ok() {
        let config = ConnectorConfig::new("id", "secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_missing_credentials() {
        let config = ConnectorConfig::new("", "secret");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_config_validate_bad_url() {
        let mut config = ConnectorConfig::new("id", "secret");
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let json = serde_json::json!({
            "credentials": {"client_id": "id", "client_secret": "secret"}
        });
        let config: ConnectorConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.requests_per_minute, 600);
    }
}
