//! Company handlers.
//!
//! ## Commands
//! - Registering a company with the fiscal provider and reconciling the tenant store
//! - Partially updating a registered company
//!
//! ## Queries
//! - Relaying read/delete calls to the provider unchanged

mod create_company;
mod relay_request;
mod update_company;

// Commands
pub use create_company::{CreateCompanyCommand, CreateCompanyHandler, CreateCompanyResult};
pub use update_company::{UpdateCompanyCommand, UpdateCompanyHandler, UpdateCompanyResult};

// Queries
pub use relay_request::RelayRequestHandler;
