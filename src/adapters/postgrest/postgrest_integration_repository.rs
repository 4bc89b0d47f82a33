//! PostgREST implementation of IntegrationRepository.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use super::postgrest_client::{eq, PostgrestClient};
use crate::domain::foundation::{CertificateId, CompanyId};
use crate::domain::integration::{CertificateWindow, IntegrationErrorRecord, IntegrationFact};
use crate::ports::{IntegrationRepository, PersistenceError};

const INTEGRATIONS: &str = "focus_integration";
const COMPANIES: &str = "companies";
const COMPANY_CERTIFICATES: &str = "company_certificates_access";
const CERTIFICATES: &str = "certificates_access";
const INTEGRATION_ERRORS: &str = "focus_integration_errors";

/// Integration repository backed by the tenant's PostgREST API.
///
/// When `certificate_window_rpc` is set, the certificate window update is a
/// single stored-procedure call instead of a lookup followed by a PATCH.
pub struct PostgrestIntegrationRepository {
    client: PostgrestClient,
    certificate_window_rpc: Option<String>,
}

impl PostgrestIntegrationRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self {
            client,
            certificate_window_rpc: None,
        }
    }

    pub fn with_certificate_window_rpc(mut self, name: Option<String>) -> Self {
        self.certificate_window_rpc = name.filter(|n| !n.trim().is_empty());
        self
    }

    /// First certificate associated with the company, if any.
    async fn find_certificate_access_id(
        &self,
        company_id: &CompanyId,
    ) -> Result<Option<String>, PersistenceError> {
        let rows = self
            .client
            .select(
                COMPANY_CERTIFICATES,
                &[
                    ("select", "certificate_access_id".to_string()),
                    ("company_id", eq(company_id.as_str())),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows
            .first()
            .and_then(|row| row.get("certificate_access_id"))
            .and_then(scalar_to_string)
            .filter(|id| !id.is_empty()))
    }
}

/// Association ids may come back as strings or numbers.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// PATCH body for `certificates_access`: provided dates plus `active = true`.
fn certificate_changes(window: &CertificateWindow) -> Value {
    let mut changes = Map::new();
    if let Some(expires_at) = window.expires_at {
        changes.insert("expiration_date".into(), json!(expires_at.to_rfc3339()));
    }
    if let Some(effective_from) = window.effective_from {
        changes.insert("effective_date".into(), json!(effective_from.to_rfc3339()));
    }
    changes.insert("active".into(), Value::Bool(true));
    Value::Object(changes)
}

fn error_row(company_id: &CompanyId, record: &IntegrationErrorRecord) -> Value {
    let mut row = Map::new();
    row.insert("company_id".into(), json!(company_id.as_str()));
    row.insert("code".into(), json!(record.code));
    row.insert("message".into(), json!(record.message));
    row.insert("errors".into(), record.errors.clone());
    if let Some(certificate_id) = &record.certificate_id {
        row.insert("certificates_id".into(), json!(certificate_id.as_str()));
    }
    Value::Object(row)
}

#[async_trait]
impl IntegrationRepository for PostgrestIntegrationRepository {
    async fn insert_integration(
        &self,
        company_id: &CompanyId,
        fact: &IntegrationFact,
    ) -> Result<(), PersistenceError> {
        let row = json!({
            "company_id": company_id.as_str(),
            "focus_company_id": fact.provider_company_id.as_str(),
            "token_focus_company": fact.production_token,
        });
        self.client.insert(INTEGRATIONS, &row).await
    }

    async fn mark_company_integrated(
        &self,
        company_id: &CompanyId,
    ) -> Result<(), PersistenceError> {
        let changes = json!({
            "focus_integrated": true,
            "updated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.client
            .update(COMPANIES, &[("id", eq(company_id.as_str()))], &changes)
            .await
    }

    async fn update_certificate_window(
        &self,
        company_id: &CompanyId,
        window: &CertificateWindow,
    ) -> Result<(), PersistenceError> {
        if let Some(rpc) = &self.certificate_window_rpc {
            let args = json!({
                "p_company_id": company_id.as_str(),
                "p_effective_date": window.effective_from.map(|d| d.to_rfc3339()),
                "p_expiration_date": window.expires_at.map(|d| d.to_rfc3339()),
            });
            self.client.rpc(rpc, &args).await?;
            return Ok(());
        }

        let Some(certificate_id) = self.find_certificate_access_id(company_id).await? else {
            tracing::debug!(%company_id, "No certificate associated with company");
            return Ok(());
        };

        self.client
            .update(
                CERTIFICATES,
                &[("id", eq(&certificate_id))],
                &certificate_changes(window),
            )
            .await
    }

    async fn insert_integration_error(
        &self,
        company_id: &CompanyId,
        record: &IntegrationErrorRecord,
    ) -> Result<(), PersistenceError> {
        self.client
            .insert(INTEGRATION_ERRORS, &error_row(company_id, record))
            .await
    }

    async fn delete_integration_errors(
        &self,
        company_id: &CompanyId,
        certificate_id: &CertificateId,
    ) -> Result<(), PersistenceError> {
        self.client
            .delete(
                INTEGRATION_ERRORS,
                &[
                    ("company_id", eq(company_id.as_str())),
                    ("certificates_id", eq(certificate_id.as_str())),
                ],
            )
            .await
    }
}
