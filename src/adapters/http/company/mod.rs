//! HTTP adapter for company endpoints.
//!
//! Exposes the provider's company-registration resource:
//! - `POST /v2/empresas` - Register a company and reconcile the tenant store
//! - `GET /v2/empresas` - List companies
//! - `GET /v2/empresas/{id}` - Get one company
//! - `PUT /v2/empresas/{id}` - Partially update a company
//! - `DELETE /v2/empresas/{id}` - Delete a company

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CreateCompanyParams, UpdateCompanyParams};
pub use handlers::CompanyAppState;
pub use routes::company_routes;
