//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `FiscalProvider` - Outbound calls to the fiscal-document API
//! - `IntegrationRepository` - Writes to the tenant's data store

mod fiscal_provider;
mod integration_repository;

pub use fiscal_provider::{FiscalProvider, GatewayError, ProviderMethod, ProviderRequest};
pub use integration_repository::{IntegrationRepository, PersistenceError};
