//! Tenant persistence configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Which store receives integration facts and audit rows.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    /// PostgREST over HTTP
    #[default]
    Postgrest,
    /// Direct SQL through a connection pool
    Postgres,
    /// In-process store (development only)
    Memory,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub backend: PersistenceBackend,

    /// PostgREST base URL or PostgreSQL connection URL, depending on backend
    #[serde(default)]
    pub url: String,

    /// PostgREST service key
    #[serde(default)]
    pub key: Option<SecretString>,

    /// Schema holding the integration tables
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Stored procedure for certificate window updates (PostgREST only)
    #[serde(default)]
    pub certificate_window_rpc: Option<String>,

    /// Maximum pool size (postgres only)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl PersistenceConfig {
    /// Validate persistence configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_identifier(&self.schema) {
            return Err(ValidationError::InvalidSchema);
        }

        match self.backend {
            PersistenceBackend::Postgrest => {
                if self.url.is_empty() {
                    return Err(ValidationError::MissingRequired("PERSISTENCE__URL"));
                }
                if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
                    return Err(ValidationError::InvalidPostgrestUrl);
                }
                if self.key.is_none() {
                    return Err(ValidationError::MissingRequired("PERSISTENCE__KEY"));
                }
                if let Some(rpc) = &self.certificate_window_rpc {
                    if !is_identifier(rpc) {
                        return Err(ValidationError::InvalidSchema);
                    }
                }
            }
            PersistenceBackend::Postgres => {
                if self.url.is_empty() {
                    return Err(ValidationError::MissingRequired("PERSISTENCE__URL"));
                }
                if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
                    return Err(ValidationError::InvalidDatabaseUrl);
                }
                if self.max_connections == 0 || self.max_connections > 100 {
                    return Err(ValidationError::InvalidPoolSize);
                }
            }
            PersistenceBackend::Memory => {}
        }
        Ok(())
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: PersistenceBackend::default(),
            url: String::new(),
            key: None,
            schema: default_schema(),
            certificate_window_rpc: None,
            max_connections: default_max_connections(),
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_schema() -> String {
    "company".to_string()
}

fn default_max_connections() -> u32 {
    5
}
