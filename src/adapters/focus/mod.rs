//! Focus NFe fiscal provider adapter.
//!
//! Implements the `FiscalProvider` port for the Focus NFe v2 API:
//! - Company registration (`/v2/empresas`)
//! - CNPJ lookup (`/v2/cnpjs`)
//! - Municipality catalog (`/v2/municipios`)
//!
//! # Security
//!
//! - The API token is held as `secrecy::SecretString` and never logged
//!
//! # Configuration
//!
//! - `FISCAL_BRIDGE__PROVIDER__BASE_URL`: API base URL
//! - `FISCAL_BRIDGE__PROVIDER__API_TOKEN`: API token

mod focus_gateway;
mod mock_fiscal_provider;

pub use focus_gateway::{FocusConfig, FocusGateway, DEFAULT_TIMEOUT};
pub use mock_fiscal_provider::MockFiscalProvider;
