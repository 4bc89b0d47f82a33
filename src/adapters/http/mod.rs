//! HTTP adapters - REST API implementations.
//!
//! - `company` - Company registration endpoints (reconciliation + passthrough)
//! - `catalog` - CNPJ and municipality lookups
//! - `health` - Liveness
//! - `relay` - Provider response to axum response
//! - `router` - Full application router with CORS, tracing and request ids

pub mod catalog;
pub mod company;
pub mod error;
pub mod health;
pub mod relay;
pub mod router;

// Re-export key types for convenience
pub use company::CompanyAppState;
pub use error::{ApiError, ErrorResponse, ProviderRejectedResponse};
pub use relay::INTEGRATION_WARNING_HEADER;
pub use router::{app_router, build_cors_layer};
