//! In-Memory Integration Repository
//!
//! Stores integration facts, company flags, certificate windows and the error
//! audit trail in memory. Used by the `memory` persistence backend for local
//! development, and by tests that need to inspect what the workflows wrote.
//!
//! Individual operations can be made to fail to exercise partial-persistence
//! paths.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{CertificateId, CompanyId};
use crate::domain::integration::{CertificateWindow, IntegrationErrorRecord, IntegrationFact};
use crate::ports::{IntegrationRepository, PersistenceError};

/// Row of `focus_integration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIntegration {
    pub company_id: CompanyId,
    pub provider_company_id: String,
    pub production_token: String,
}

/// Row of `companies` (only the columns this service touches).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCompany {
    pub focus_integrated: bool,
    pub updated_at: DateTime<Utc>,
}

/// Row of `certificates_access`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCertificate {
    pub id: CertificateId,
    pub effective_date: Option<DateTime<FixedOffset>>,
    pub expiration_date: Option<DateTime<FixedOffset>>,
    pub active: bool,
}

/// Row of `focus_integration_errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredIntegrationError {
    pub company_id: CompanyId,
    pub code: Option<String>,
    pub message: Option<String>,
    pub errors: Value,
    pub certificate_id: Option<CertificateId>,
}

#[derive(Debug, Default)]
struct MemoryState {
    integrations: Vec<StoredIntegration>,
    companies: HashMap<CompanyId, StoredCompany>,
    associations: HashMap<CompanyId, CertificateId>,
    certificates: HashMap<CertificateId, StoredCertificate>,
    window_updates: Vec<(CompanyId, CertificateWindow)>,
    errors: Vec<StoredIntegrationError>,
    failing: HashSet<String>,
    call_log: Vec<String>,
}

/// In-memory implementation of the IntegrationRepository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryIntegrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a (new, inactive) certificate with a company.
    pub async fn add_certificate(&self, company_id: CompanyId, certificate_id: CertificateId) {
        let mut state = self.state.write().await;
        state.certificates.insert(
            certificate_id.clone(),
            StoredCertificate {
                id: certificate_id.clone(),
                effective_date: None,
                expiration_date: None,
                active: false,
            },
        );
        state.associations.insert(company_id, certificate_id);
    }

    /// Seeds an audit row, as if written by an earlier rejected registration.
    pub async fn add_integration_error(&self, row: StoredIntegrationError) {
        self.state.write().await.errors.push(row);
    }

    /// Makes every subsequent call to the named operation fail.
    ///
    /// Operation names match the port method names, e.g. `"mark_company_integrated"`.
    pub async fn fail_operation(&self, operation: &str) {
        self.state
            .write()
            .await
            .failing
            .insert(operation.to_string());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn integrations(&self) -> Vec<StoredIntegration> {
        self.state.read().await.integrations.clone()
    }

    pub async fn company(&self, company_id: &CompanyId) -> Option<StoredCompany> {
        self.state.read().await.companies.get(company_id).cloned()
    }

    pub async fn certificate(&self, certificate_id: &CertificateId) -> Option<StoredCertificate> {
        self.state
            .read()
            .await
            .certificates
            .get(certificate_id)
            .cloned()
    }

    /// Every certificate window the workflows asked to write, in order.
    pub async fn window_updates(&self) -> Vec<(CompanyId, CertificateWindow)> {
        self.state.read().await.window_updates.clone()
    }

    pub async fn integration_errors(&self) -> Vec<StoredIntegrationError> {
        self.state.read().await.errors.clone()
    }

    /// Operation names in call order, including failed calls.
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.call_log.clone()
    }
}

/// Logs the call and applies failure injection.
fn enter(state: &mut MemoryState, operation: &str) -> Result<(), PersistenceError> {
    state.call_log.push(operation.to_string());
    if state.failing.contains(operation) {
        return Err(PersistenceError::backend(format!(
            "simulated {} failure",
            operation
        )));
    }
    Ok(())
}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrationRepository {
    async fn insert_integration(
        &self,
        company_id: &CompanyId,
        fact: &IntegrationFact,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        enter(&mut state, "insert_integration")?;
        state.integrations.push(StoredIntegration {
            company_id: company_id.clone(),
            provider_company_id: fact.provider_company_id.as_str().to_string(),
            production_token: fact.production_token.clone(),
        });
        Ok(())
    }

    async fn mark_company_integrated(
        &self,
        company_id: &CompanyId,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        enter(&mut state, "mark_company_integrated")?;
        state.companies.insert(
            company_id.clone(),
            StoredCompany {
                focus_integrated: true,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn update_certificate_window(
        &self,
        company_id: &CompanyId,
        window: &CertificateWindow,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        enter(&mut state, "update_certificate_window")?;
        state.window_updates.push((company_id.clone(), *window));

        let Some(certificate_id) = state.associations.get(company_id).cloned() else {
            return Ok(());
        };
        if let Some(certificate) = state.certificates.get_mut(&certificate_id) {
            if window.effective_from.is_some() {
                certificate.effective_date = window.effective_from;
            }
            if window.expires_at.is_some() {
                certificate.expiration_date = window.expires_at;
            }
            certificate.active = true;
        }
        Ok(())
    }

    async fn insert_integration_error(
        &self,
        company_id: &CompanyId,
        record: &IntegrationErrorRecord,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        enter(&mut state, "insert_integration_error")?;
        state.errors.push(StoredIntegrationError {
            company_id: company_id.clone(),
            code: record.code.clone(),
            message: record.message.clone(),
            errors: record.errors.clone(),
            certificate_id: record.certificate_id.clone(),
        });
        Ok(())
    }

    async fn delete_integration_errors(
        &self,
        company_id: &CompanyId,
        certificate_id: &CertificateId,
    ) -> Result<(), PersistenceError> {
        let mut state = self.state.write().await;
        enter(&mut state, "delete_integration_errors")?;
        state.errors.retain(|row| {
            !(&row.company_id == company_id && row.certificate_id.as_ref() == Some(certificate_id))
        });
        Ok(())
    }
}
