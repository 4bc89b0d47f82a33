//! Fiscal provider configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Focus NFe connection settings.
///
/// The API token may be blank at startup; calls then fail with a
/// configuration error instead of the process refusing to start.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL (production or homologation)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token (Basic auth username)
    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_token(&self) -> SecretString {
        self.api_token
            .clone()
            .unwrap_or_else(|| SecretString::new(String::new()))
    }

    /// Validate provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidProviderUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.focusnfe.com.br".to_string()
}

fn default_timeout() -> u64 {
    30
}
