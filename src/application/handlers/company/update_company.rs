//! UpdateCompanyHandler - Command handler for partial company updates.

use std::sync::Arc;

use crate::domain::catalog::required_segment;
use crate::domain::foundation::{CertificateId, CompanyId};
use crate::domain::integration::{
    CertificateWindow, IntegrationError, ProviderResponse, UpdateCompanyPayload,
};
use crate::ports::{FiscalProvider, IntegrationRepository, ProviderRequest};

/// Command to update a company registered with the provider.
#[derive(Debug, Clone)]
pub struct UpdateCompanyCommand {
    /// Provider company id from the path.
    pub provider_company_id: String,
    /// Tenant company id (optional query parameter).
    pub company_id: Option<String>,
    /// Tenant certificate id (optional query parameter).
    pub certificate_id: Option<String>,
    /// Raw inbound JSON body.
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UpdateCompanyResult {
    /// Provider response, relayed unchanged.
    pub response: ProviderResponse,
    pub certificate_touched: bool,
}

/// Handler for partial company updates.
///
/// Only fields present in the request reach the provider. When a successful
/// update replaces certificate material, the tenant's certificate window is
/// refreshed and stale certificate errors are cleared. Those writes are
/// best-effort and never surface to the caller.
pub struct UpdateCompanyHandler {
    provider: Arc<dyn FiscalProvider>,
    repository: Arc<dyn IntegrationRepository>,
}

impl UpdateCompanyHandler {
    pub fn new(
        provider: Arc<dyn FiscalProvider>,
        repository: Arc<dyn IntegrationRepository>,
    ) -> Self {
        Self {
            provider,
            repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateCompanyCommand,
    ) -> Result<UpdateCompanyResult, IntegrationError> {
        let provider_company_id = required_segment("id", &cmd.provider_company_id)?;
        let company_id = CompanyId::from_optional(cmd.company_id.as_deref());
        let certificate_id = CertificateId::from_optional(cmd.certificate_id.as_deref());

        let payload = UpdateCompanyPayload::sanitize(&cmd.body)?;
        let certificate_touched = payload.touches_certificate();

        tracing::info!(
            provider_company_id = %provider_company_id,
            fields = payload.field_count(),
            certificate_touched,
            "Updating company with fiscal provider"
        );

        let response = self
            .provider
            .call(ProviderRequest::update_company(
                &provider_company_id,
                payload.to_bytes(),
            ))
            .await
            .map_err(|e| {
                tracing::error!(%provider_company_id, error = %e, "Fiscal provider update call failed");
                IntegrationError::provider_unavailable(e.to_string())
            })?;

        if response.is_success() && certificate_touched {
            if let Some(company_id) = &company_id {
                self.refresh_certificate(company_id, certificate_id.as_ref(), &response)
                    .await;
            }
        }

        Ok(UpdateCompanyResult {
            response,
            certificate_touched,
        })
    }

    async fn refresh_certificate(
        &self,
        company_id: &CompanyId,
        certificate_id: Option<&CertificateId>,
        response: &ProviderResponse,
    ) {
        let window = CertificateWindow::from_body(&response.body);
        match self
            .repository
            .update_certificate_window(company_id, &window)
            .await
        {
            Ok(()) => tracing::info!(
                %company_id,
                effective_from = ?window.effective_from,
                expires_at = ?window.expires_at,
                "Certificate window updated"
            ),
            Err(e) => {
                tracing::error!(%company_id, error = %e, "Failed to update certificate window")
            }
        }

        if let Some(certificate_id) = certificate_id {
            match self
                .repository
                .delete_integration_errors(company_id, certificate_id)
                .await
            {
                Ok(()) => tracing::info!(%company_id, %certificate_id, "Stale certificate errors cleared"),
                Err(e) => tracing::error!(
                    %company_id,
                    %certificate_id,
                    error = %e,
                    "Failed to clear stale certificate errors"
                ),
            }
        }
    }
}
