//! Integration module - Company registration reconciliation with the fiscal provider.
//!
//! # Overview
//!
//! - `payload` - Sanitizes inbound create/update bodies before forwarding
//! - `response` - Buffered provider responses and status-class classification
//! - `fact` - Facts extracted from successful registrations
//! - `error_record` - Audit rows for rejected registrations
//! - `report` - Outcome of the post-registration persistence plan

mod error_record;
mod errors;
mod fact;
mod payload;
mod report;
mod response;

pub use error_record::{IntegrationErrorRecord, ProviderErrorBody};
pub use errors::{IntegrationError, REGISTRATION_REJECTED_MESSAGE, REGISTRATION_UNAVAILABLE_MESSAGE};
pub use fact::{CertificateWindow, IntegrationFact, ProviderCompanyView};
pub use payload::{
    CreateCompanyPayload, PayloadError, UpdateCompanyPayload, CERTIFICATE_FILE_FIELD,
    CERTIFICATE_PASSWORD_FIELD, CERTIFICATE_REF_FIELD,
};
pub use report::{PersistenceReport, PersistenceStep, StepFailure, MISSING_FACT_WARNING};
pub use response::{ProviderOutcome, ProviderResponse, RELAYED_HEADERS};
