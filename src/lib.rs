//! Fiscal Bridge - company registration bridge to the Focus NFe API
//!
//! Forwards company create/update requests from the tenant back-office to the
//! fiscal provider, records the integration outcome in the tenant's store, and
//! relays the provider's read-only catalog endpoints.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
