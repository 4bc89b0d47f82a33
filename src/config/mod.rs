//! Application configuration module
//!
//! Configuration is loaded from environment variables with the
//! `FISCAL_BRIDGE` prefix; nested values use double underscores.
//!
//! # Example
//!
//! ```no_run
//! use fiscal_bridge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod persistence;
mod provider;
mod server;

pub use error::{ConfigError, ValidationError};
pub use persistence::{PersistenceBackend, PersistenceConfig};
pub use provider::ProviderConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Fiscal provider (Focus NFe)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Tenant persistence backend
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `FISCAL_BRIDGE__<SECTION>__<KEY>`
    /// variables, e.g. `FISCAL_BRIDGE__SERVER__PORT=8082` or
    /// `FISCAL_BRIDGE__PROVIDER__API_TOKEN=...`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FISCAL_BRIDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.provider.validate()?;
        self.persistence.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
