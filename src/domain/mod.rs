//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, validation errors, error codes)
//! - `integration` - Company registration reconciliation with the fiscal provider
//! - `catalog` - Validated parameters for CNPJ and municipality lookups

pub mod catalog;
pub mod foundation;
pub mod integration;
