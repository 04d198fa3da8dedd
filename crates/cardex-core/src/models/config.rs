//! Configuration structures for the extraction client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::PollOptions;
use crate::error::{CardexError, Result};

/// Default product endpoint for business card predictions.
pub const DEFAULT_BASE_URL: &str = "https://api.mindee.net/v1/products/mindee/business_card/v1";

/// Main configuration for the extraction client.
///
/// There is deliberately no default API key: a config without one fails
/// [`ClientConfig::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API key sent in the `Authorization` header.
    pub api_key: String,

    /// Base URL of the prediction product.
    pub base_url: String,

    /// Scheme prefix for the `Authorization` header.
    pub auth_scheme: String,

    /// File name given to binary uploads.
    pub file_name: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Job polling configuration.
    pub poll: PollConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_scheme: "Token".to_string(),
            file_name: "business_card.jpg".to_string(),
            request_timeout_secs: 30,
            poll: PollConfig::default(),
        }
    }
}

/// Job polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Maximum number of status queries per job.
    pub max_attempts: u32,

    /// Fixed wait between status queries, in milliseconds.
    pub delay_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay_ms: 2000,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given API key and defaults elsewhere.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the polling parameters.
    pub fn with_poll(mut self, max_attempts: u32, delay_ms: u64) -> Self {
        self.poll = PollConfig {
            max_attempts,
            delay_ms,
        };
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check that the configuration can drive a client.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(CardexError::Config("missing API key".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(CardexError::Config("missing base URL".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CardexError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.poll.max_attempts == 0 {
            return Err(CardexError::Config(
                "poll.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Polling options derived from this configuration.
    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            max_attempts: self.poll.max_attempts,
            delay: Duration::from_millis(self.poll.delay_ms),
        }
    }

    /// Value of the `Authorization` header. The key is used verbatim.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.auth_scheme, self.api_key)
    }
}
