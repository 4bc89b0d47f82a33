//! HTTP adapter for provider catalog lookups.
//!
//! - `GET /v2/cnpjs/{cnpj}` - CNPJ registry lookup
//! - `GET /v2/municipios/...` - Municipality, service list and municipal tax code catalogs

pub mod handlers;
pub mod routes;

pub use routes::catalog_routes;
