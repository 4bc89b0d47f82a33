//! CreateCompanyHandler - Command handler for registering a company with the fiscal provider.

use std::sync::Arc;

use crate::domain::foundation::{CertificateId, CompanyId};
use crate::domain::integration::{
    CreateCompanyPayload, IntegrationError, IntegrationErrorRecord, IntegrationFact,
    PersistenceReport, PersistenceStep, ProviderErrorBody, ProviderOutcome, ProviderResponse,
};
use crate::ports::{FiscalProvider, IntegrationRepository, PersistenceError, ProviderRequest};

/// Command to register a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyCommand {
    /// Tenant company id from the `company_id` query parameter.
    pub company_id: Option<String>,
    /// Raw inbound JSON body.
    pub body: Vec<u8>,
}

/// Result of a registration the provider accepted.
#[derive(Debug, Clone)]
pub struct CreateCompanyResult {
    /// Provider response, relayed to the caller unchanged.
    pub response: ProviderResponse,
    pub report: PersistenceReport,
}

impl CreateCompanyResult {
    /// Advisory warning for the caller, if any persistence step failed.
    pub fn warning(&self) -> Option<&str> {
        self.report.warning()
    }
}

/// Handler for company registration.
///
/// Forwards the sanitized payload to the provider and reconciles the outcome
/// with the tenant store. A persistence failure never changes the HTTP
/// outcome; it only produces an advisory warning.
pub struct CreateCompanyHandler {
    provider: Arc<dyn FiscalProvider>,
    repository: Arc<dyn IntegrationRepository>,
}

impl CreateCompanyHandler {
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
        cmd: CreateCompanyCommand,
    ) -> Result<CreateCompanyResult, IntegrationError> {
        // 1. Require the tenant company id
        let company_id = CompanyId::from_optional(cmd.company_id.as_deref())
            .ok_or(IntegrationError::MissingCompanyId)?;

        // 2. Sanitize the payload
        let payload = CreateCompanyPayload::sanitize(&cmd.body)?;

        tracing::info!(
            %company_id,
            fields = payload.fields().len(),
            has_certificate_ref = payload.certificate_ref().is_some(),
            "Registering company with fiscal provider"
        );

        // 3. Call the provider
        let response = self
            .provider
            .call(ProviderRequest::create_company(payload.to_bytes()))
            .await
            .map_err(|e| {
                tracing::error!(%company_id, error = %e, "Fiscal provider registration call failed");
                IntegrationError::registration_unavailable(e.to_string())
            })?;

        // 4. Branch on status class
        match response.classify() {
            ProviderOutcome::ProviderError(response) => {
                tracing::warn!(
                    %company_id,
                    status = response.status,
                    "Fiscal provider rejected registration"
                );
                self.record_rejection(&company_id, payload.certificate_ref(), &response)
                    .await;
                Err(IntegrationError::provider_rejected(
                    response.status,
                    response.body,
                ))
            }
            ProviderOutcome::Success(response) => {
                let report = match IntegrationFact::from_body(&response.body) {
                    Some(fact) => {
                        self.persist(&company_id, &fact, payload.certificate_ref())
                            .await
                    }
                    None => {
                        tracing::warn!(
                            %company_id,
                            "Provider response lacks the company id or production token; skipping persistence"
                        );
                        PersistenceReport::missing_fact()
                    }
                };
                Ok(CreateCompanyResult { response, report })
            }
        }
    }

    /// Writes the audit row for a rejected registration. Failures are logged only.
    async fn record_rejection(
        &self,
        company_id: &CompanyId,
        certificate_ref: Option<&CertificateId>,
        response: &ProviderResponse,
    ) {
        let Some(body) = ProviderErrorBody::parse(&response.body) else {
            tracing::warn!(
                %company_id,
                status = response.status,
                "Provider error body is not a recognizable envelope; no audit row written"
            );
            return;
        };

        let record = IntegrationErrorRecord::from_provider_error(body, certificate_ref);
        if let Err(e) = self
            .repository
            .insert_integration_error(company_id, &record)
            .await
        {
            tracing::error!(%company_id, error = %e, "Failed to record provider integration error");
        }
    }

    /// Runs the persistence plan. Every step runs regardless of earlier failures.
    async fn persist(
        &self,
        company_id: &CompanyId,
        fact: &IntegrationFact,
        certificate_ref: Option<&CertificateId>,
    ) -> PersistenceReport {
        let mut report = PersistenceReport::new();

        for step in PersistenceStep::PLAN {
            let outcome = match step {
                PersistenceStep::InsertIntegration => {
                    self.repository.insert_integration(company_id, fact).await
                }
                PersistenceStep::MarkCompanyIntegrated => {
                    self.repository.mark_company_integrated(company_id).await
                }
                PersistenceStep::UpdateCertificateWindow => {
                    if fact.certificate_window.is_empty() {
                        tracing::debug!(
                            %company_id,
                            "Provider response carries no certificate dates; window update has nothing to write"
                        );
                    }
                    self.repository
                        .update_certificate_window(company_id, &fact.certificate_window)
                        .await
                }
                PersistenceStep::DeleteIntegrationErrors => match certificate_ref {
                    Some(certificate_id) => {
                        self.repository
                            .delete_integration_errors(company_id, certificate_id)
                            .await
                    }
                    None => continue,
                },
            };
            record_step(&mut report, company_id, step, outcome);
        }

        report
    }
}

fn record_step(
    report: &mut PersistenceReport,
    company_id: &CompanyId,
    step: PersistenceStep,
    outcome: Result<(), PersistenceError>,
) {
    match outcome {
        Ok(()) => {
            tracing::debug!(%company_id, %step, "Persistence step completed");
            report.record_success(step);
        }
        Err(e) => {
            tracing::error!(%company_id, %step, error = %e, "Persistence step failed");
            report.record_failure(step, e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::focus::MockFiscalProvider;
    use crate::adapters::memory::InMemoryIntegrationRepository;
    use crate::domain::integration::{MISSING_FACT_WARNING, REGISTRATION_UNAVAILABLE_MESSAGE};
    use crate::ports::GatewayError;
    use chrono::DateTime;
    use serde_json::{json, Value};

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn company() -> CompanyId {
        CompanyId::new("company-1").unwrap()
    }

    fn cert(id: &str) -> CertificateId {
        CertificateId::new(id).unwrap()
    }

    fn success_body() -> Vec<u8> {
        json!({
            "id": 170571,
            "nome": "INFINITY CODE SOLUTIONS LTDA",
            "token_producao": "abc",
            "certificado_valido_ate": "2026-11-12T14:33:00-03:00",
            "certificado_valido_de": "2025-11-12T14:33:00-03:00"
        })
        .to_string()
        .into_bytes()
    }

    fn command(company_id: Option<&str>, body: Value) -> CreateCompanyCommand {
        CreateCompanyCommand {
            company_id: company_id.map(str::to_string),
            body: body.to_string().into_bytes(),
        }
    }

    fn setup(
        response: ProviderResponse,
    ) -> (
        CreateCompanyHandler,
        MockFiscalProvider,
        InMemoryIntegrationRepository,
    ) {
        let provider = MockFiscalProvider::responding(response);
        let repository = InMemoryIntegrationRepository::new();
        let handler =
            CreateCompanyHandler::new(Arc::new(provider.clone()), Arc::new(repository.clone()));
        (handler, provider, repository)
    }

    fn sent_body(provider: &MockFiscalProvider) -> Value {
        let call = provider.last_call().expect("provider was not called");
        serde_json::from_slice(&call.body.expect("no body sent")).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_company_id_fails_without_calling_provider() {
        let (handler, provider, _) = setup(ProviderResponse::new(201, success_body()));

        let result = handler.handle(command(None, json!({"nome": "A"}))).await;

        assert_eq!(result.unwrap_err(), IntegrationError::MissingCompanyId);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_company_id_counts_as_missing() {
        let (handler, provider, _) = setup(ProviderResponse::new(201, success_body()));

        let result = handler.handle(command(Some("  "), json!({"nome": "A"}))).await;

        assert_eq!(result.unwrap_err(), IntegrationError::MissingCompanyId);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_body_fails_without_calling_provider() {
        let (handler, provider, _) = setup(ProviderResponse::new(201, success_body()));

        let result = handler
            .handle(CreateCompanyCommand {
                company_id: Some("company-1".to_string()),
                body: Vec::new(),
            })
            .await;

        assert!(matches!(result, Err(IntegrationError::Payload(_))));
        assert_eq!(provider.call_count(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success path
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn certificate_ref_is_stripped_before_forwarding() {
        let (handler, provider, _) = setup(ProviderResponse::new(201, success_body()));

        handler
            .handle(command(
                Some("company-1"),
                json!({"nome": "A", "database_local_certificate_id": "X"}),
            ))
            .await
            .unwrap();

        let sent = sent_body(&provider);
        assert!(sent.get("database_local_certificate_id").is_none());
        assert_eq!(sent["nome"], "A");
    }

    #[tokio::test]
    async fn successful_registration_persists_normalized_fact() {
        let (handler, _, repository) = setup(ProviderResponse::new(201, success_body()));

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap();

        assert_eq!(result.response.status, 201);
        assert_eq!(result.response.body, success_body());
        assert!(result.warning().is_none());

        let rows = repository.integrations().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].provider_company_id, "170571");
        assert_eq!(rows[0].production_token, "abc");

        let windows = repository.window_updates().await;
        let expected = DateTime::parse_from_rfc3339("2026-11-12T14:33:00-03:00").unwrap();
        assert_eq!(windows[0].1.expires_at, Some(expected));
        assert_eq!(
            windows[0].1.expires_at.unwrap().offset().local_minus_utc(),
            -3 * 3600
        );

        assert!(repository.company(&company()).await.unwrap().focus_integrated);
    }

    #[tokio::test]
    async fn persistence_plan_runs_in_order() {
        let (handler, _, repository) = setup(ProviderResponse::new(201, success_body()));

        handler
            .handle(command(
                Some("company-1"),
                json!({"nome": "A", "database_local_certificate_id": "cert-1"}),
            ))
            .await
            .unwrap();

        let expected: Vec<String> = PersistenceStep::PLAN
            .iter()
            .map(|step| step.as_str().to_string())
            .collect();
        assert_eq!(repository.calls().await, expected);
    }

    #[tokio::test]
    async fn window_step_still_runs_when_response_has_no_certificate_dates() {
        let body = json!({"id": 170571, "token_producao": "abc"}).to_string();
        let (handler, _, repository) = setup(ProviderResponse::new(201, body));

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap();

        assert!(result.warning().is_none());
        let updates = repository.window_updates().await;
        assert_eq!(updates.len(), 1);
        assert!(updates[0].1.is_empty());
        assert_eq!(
            repository.calls().await,
            vec![
                "insert_integration",
                "mark_company_integrated",
                "update_certificate_window",
            ]
        );
    }

    #[tokio::test]
    async fn error_cleanup_is_skipped_without_certificate_ref() {
        let (handler, _, repository) = setup(ProviderResponse::new(201, success_body()));

        handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap();

        assert!(!repository
            .calls()
            .await
            .contains(&"delete_integration_errors".to_string()));
    }

    #[tokio::test]
    async fn flag_failure_yields_warning_but_keeps_provider_outcome() {
        let (handler, _, repository) = setup(ProviderResponse::new(201, success_body()));
        repository.fail_operation("mark_company_integrated").await;

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap();

        assert_eq!(result.response.status, 201);
        assert_eq!(result.response.body, success_body());
        assert_eq!(
            result.warning(),
            PersistenceStep::MarkCompanyIntegrated.warning()
        );
        // Later steps still ran.
        assert_eq!(repository.window_updates().await.len(), 1);
        assert_eq!(repository.integrations().await.len(), 1);
    }

    #[tokio::test]
    async fn first_failing_step_wins_the_warning() {
        let (handler, _, repository) = setup(ProviderResponse::new(201, success_body()));
        repository.fail_operation("insert_integration").await;
        repository.fail_operation("update_certificate_window").await;

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap();

        assert_eq!(result.warning(), PersistenceStep::InsertIntegration.warning());
        assert_eq!(result.report.failures().len(), 2);
    }

    #[tokio::test]
    async fn error_cleanup_failure_does_not_warn() {
        let (handler, _, repository) = setup(ProviderResponse::new(201, success_body()));
        repository.fail_operation("delete_integration_errors").await;

        let result = handler
            .handle(command(
                Some("company-1"),
                json!({"nome": "A", "database_local_certificate_id": "cert-1"}),
            ))
            .await
            .unwrap();

        assert!(result.warning().is_none());
        assert_eq!(result.report.failures().len(), 1);
    }

    #[tokio::test]
    async fn missing_token_skips_persistence_with_generic_warning() {
        let (handler, _, repository) =
            setup(ProviderResponse::new(201, json!({"id": 1}).to_string()));

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap();

        assert_eq!(result.warning(), Some(MISSING_FACT_WARNING));
        assert!(repository.calls().await.is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure paths
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn provider_certificate_error_is_audited_with_reference() {
        let error_body = json!({
            "codigo": "requisicao_invalida",
            "mensagem": "Parâmetros inválidos",
            "erros": [{"codigo": "certificado_invalido", "campo": "arquivo_certificado_base64"}]
        })
        .to_string();
        let (handler, _, repository) = setup(ProviderResponse::new(422, error_body.clone()));

        let result = handler
            .handle(command(
                Some("company-1"),
                json!({"nome": "A", "database_local_certificate_id": "X"}),
            ))
            .await;

        match result.unwrap_err() {
            IntegrationError::ProviderRejected { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body, error_body.into_bytes());
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let rows = repository.integration_errors().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].certificate_id, Some(cert("X")));
        assert_eq!(rows[0].code.as_deref(), Some("requisicao_invalida"));
        assert!(repository.integrations().await.is_empty());
    }

    #[tokio::test]
    async fn unparseable_provider_error_writes_no_audit_row() {
        let (handler, _, repository) = setup(ProviderResponse::new(500, "<html>oops</html>"));

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await;

        assert!(matches!(
            result,
            Err(IntegrationError::ProviderRejected { status: 500, .. })
        ));
        assert!(repository.calls().await.is_empty());
    }

    #[tokio::test]
    async fn audit_insert_failure_keeps_rejection() {
        let (handler, _, repository) =
            setup(ProviderResponse::new(400, r#"{"codigo":"x","mensagem":"y"}"#));
        repository.fail_operation("insert_integration_error").await;

        let result = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await;

        assert!(matches!(
            result,
            Err(IntegrationError::ProviderRejected { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn transport_failure_skips_persistence() {
        let provider = MockFiscalProvider::failing(GatewayError::Timeout);
        let repository = InMemoryIntegrationRepository::new();
        let handler =
            CreateCompanyHandler::new(Arc::new(provider.clone()), Arc::new(repository.clone()));

        let err = handler
            .handle(command(Some("company-1"), json!({"nome": "A"})))
            .await
            .unwrap_err();

        assert_eq!(err.message(), REGISTRATION_UNAVAILABLE_MESSAGE);
        assert_eq!(provider.call_count(), 1);
        assert!(repository.calls().await.is_empty());
    }
}
