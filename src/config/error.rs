//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Fiscal provider base URL must use http or https")]
    InvalidProviderUrl,

    #[error("PostgREST URL must use http or https")]
    InvalidPostgrestUrl,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Schema must be a plain identifier")]
    InvalidSchema,

    #[error("Pool max_connections must be between 1 and 100")]
    InvalidPoolSize,
}
