//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod company;

pub use company::{
    CreateCompanyCommand, CreateCompanyHandler, CreateCompanyResult, RelayRequestHandler,
    UpdateCompanyCommand, UpdateCompanyHandler, UpdateCompanyResult,
};
