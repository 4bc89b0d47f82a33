//! Integration repository port for the tenant's own data store.
//!
//! A narrow façade over the handful of writes the reconciliation workflow
//! performs after talking to the fiscal provider. Each method is a single,
//! independent write; there is no transaction spanning several of them.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{CertificateId, CompanyId};
use crate::domain::integration::{CertificateWindow, IntegrationErrorRecord, IntegrationFact};

/// Port for persisting integration facts and audit rows.
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Store the provider id and production token for a company.
    async fn insert_integration(
        &self,
        company_id: &CompanyId,
        fact: &IntegrationFact,
    ) -> Result<(), PersistenceError>;

    /// Flag the company as provider-integrated and stamp `updated_at`.
    async fn mark_company_integrated(&self, company_id: &CompanyId)
        -> Result<(), PersistenceError>;

    /// Write the validity window onto the company's certificate and mark it active.
    ///
    /// A company with no associated certificate is a silent no-op.
    async fn update_certificate_window(
        &self,
        company_id: &CompanyId,
        window: &CertificateWindow,
    ) -> Result<(), PersistenceError>;

    /// Append a row to the integration-error audit trail.
    async fn insert_integration_error(
        &self,
        company_id: &CompanyId,
        record: &IntegrationErrorRecord,
    ) -> Result<(), PersistenceError>;

    /// Remove audit rows for a company+certificate pair.
    async fn delete_integration_errors(
        &self,
        company_id: &CompanyId,
        certificate_id: &CertificateId,
    ) -> Result<(), PersistenceError>;
}

/// Persistence failures. Never surfaced as the primary HTTP outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The backend could not be reached.
    #[error("persistence backend unreachable: {0}")]
    Connection(String),

    /// The backend answered with an error.
    #[error("persistence backend rejected the write (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with data that could not be decoded.
    #[error("unexpected persistence response: {0}")]
    Decode(String),

    /// Any other backend failure.
    #[error("persistence failure: {0}")]
    Backend(String),
}

impl PersistenceError {
    pub fn connection(message: impl Into<String>) -> Self {
        PersistenceError::Connection(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        PersistenceError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        PersistenceError::Decode(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        PersistenceError::Backend(message.into())
    }
}
