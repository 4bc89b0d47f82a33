//! Integration tests for the company registration HTTP surface.
//!
//! Drives the full application router with a scripted fiscal provider and the
//! in-memory repository, then inspects what was forwarded and what was written.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use serde_json::{json, Value};
use tower::ServiceExt;

use fiscal_bridge::adapters::focus::MockFiscalProvider;
use fiscal_bridge::adapters::http::{app_router, CompanyAppState, INTEGRATION_WARNING_HEADER};
use fiscal_bridge::adapters::memory::InMemoryIntegrationRepository;
use fiscal_bridge::domain::foundation::{CertificateId, CompanyId};
use fiscal_bridge::domain::integration::{IntegrationFact, ProviderResponse};
use fiscal_bridge::ports::{GatewayError, ProviderMethod};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    provider: MockFiscalProvider,
    repository: InMemoryIntegrationRepository,
}

impl Harness {
    fn new(provider: MockFiscalProvider) -> Self {
        Self {
            provider,
            repository: InMemoryIntegrationRepository::new(),
        }
    }

    fn app(&self) -> Router {
        let state = CompanyAppState::new(
            Arc::new(self.provider.clone()),
            Arc::new(self.repository.clone()),
        );
        app_router(state, &["http://localhost:4200".to_string()])
    }

    async fn send(&self, method: &str, uri: &str, body: Value) -> axum::response::Response {
        self.app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn forwarded_json(provider: &MockFiscalProvider) -> Value {
    let call = provider.last_call().expect("provider was not called");
    serde_json::from_slice(call.body.as_deref().expect("no body forwarded")).unwrap()
}

fn company(id: &str) -> CompanyId {
    CompanyId::new(id).unwrap()
}

fn certificate(id: &str) -> CertificateId {
    CertificateId::new(id).unwrap()
}

const REGISTERED: &str = r#"{"id":170571,"nome":"ACME LTDA","token_producao":"tok-prod","certificado_valido_ate":"2026-11-12T14:33:00-03:00","certificado_valido_de":"2025-11-12T14:33:00-03:00"}"#;

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_without_company_id_is_rejected_without_calling_provider() {
    let harness = Harness::new(MockFiscalProvider::new());

    let response = harness
        .send("POST", "/v2/empresas", json!({"nome": "ACME"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error_code"], "MISSING_COMPANY_ID");
    assert_eq!(harness.provider.call_count(), 0);
}

#[tokio::test]
async fn create_never_forwards_certificate_reference() {
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        422,
        r#"{"codigo":"requisicao_invalida","mensagem":"Certificado invalido","erros":[{"campo":"arquivo_certificado_base64","mensagem":"invalido"}]}"#,
    )));

    harness
        .send(
            "POST",
            "/v2/empresas?company_id=c-1",
            json!({"nome": "ACME", "database_local_certificate_id": "X"}),
        )
        .await;

    let forwarded = forwarded_json(&harness.provider);
    assert!(forwarded.get("database_local_certificate_id").is_none());
    assert_eq!(forwarded["nome"], "ACME");

    let errors = harness.repository.integration_errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].certificate_id, Some(certificate("X")));
}

#[tokio::test]
async fn successful_create_persists_normalized_fact_and_relays_original_bytes() {
    let harness = Harness::new(MockFiscalProvider::responding(
        ProviderResponse::new(201, REGISTERED).with_header("content-type", "application/json"),
    ));
    harness
        .repository
        .add_certificate(company("c-1"), certificate("cert-1"))
        .await;

    let response = harness
        .send("POST", "/v2/empresas?company_id=c-1", json!({"nome": "ACME"}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(INTEGRATION_WARNING_HEADER).is_none());
    assert_eq!(body_bytes(response).await, REGISTERED.as_bytes());

    let integrations = harness.repository.integrations().await;
    assert_eq!(integrations.len(), 1);
    assert_eq!(integrations[0].provider_company_id, "170571");
    assert_eq!(integrations[0].production_token, "tok-prod");

    assert!(harness.repository.company(&company("c-1")).await.unwrap().focus_integrated);

    let stored = harness.repository.certificate(&certificate("cert-1")).await.unwrap();
    let expected = DateTime::parse_from_rfc3339("2026-11-12T14:33:00-03:00").unwrap();
    assert_eq!(stored.expiration_date, Some(expected));
    assert_eq!(stored.expiration_date.unwrap().offset(), expected.offset());
    assert!(stored.active);
}

#[tokio::test]
async fn provider_certificate_rejection_is_audited_and_reported_as_bad_gateway() {
    let rejection = r#"{"codigo":"requisicao_invalida","mensagem":"Certificado invalido","erros":[{"campo":"arquivo_certificado_base64","mensagem":"senha incorreta"}]}"#;
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        422, rejection,
    )));

    let response = harness
        .send(
            "POST",
            "/v2/empresas?company_id=c-1",
            json!({"nome": "ACME", "database_local_certificate_id": "cert-7"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["provider_status"], 422);
    assert_eq!(body["provider_body"]["codigo"], "requisicao_invalida");

    let errors = harness.repository.integration_errors().await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].company_id, company("c-1"));
    assert_eq!(errors[0].code.as_deref(), Some("requisicao_invalida"));
    assert_eq!(errors[0].certificate_id, Some(certificate("cert-7")));
    assert!(harness.repository.integrations().await.is_empty());
}

#[tokio::test]
async fn failed_integration_flag_still_returns_created_with_warning() {
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        201, REGISTERED,
    )));
    harness.repository.fail_operation("mark_company_integrated").await;

    let response = harness
        .send("POST", "/v2/empresas?company_id=c-1", json!({"nome": "ACME"}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let warning = response
        .headers()
        .get(INTEGRATION_WARNING_HEADER)
        .expect("warning header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!warning.is_empty());
    assert_eq!(body_bytes(response).await, REGISTERED.as_bytes());
    assert_eq!(harness.repository.integrations().await.len(), 1);
}

#[tokio::test]
async fn unreachable_provider_is_bad_gateway_without_persistence() {
    let harness = Harness::new(MockFiscalProvider::failing(GatewayError::Timeout));

    let response = harness
        .send("POST", "/v2/empresas?company_id=c-1", json!({"nome": "ACME"}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(harness.repository.calls().await.is_empty());
}

#[tokio::test]
async fn fact_extraction_depends_only_on_response_bytes() {
    let first = IntegrationFact::from_body(REGISTERED.as_bytes());
    let second = IntegrationFact::from_body(REGISTERED.as_bytes());
    assert!(first.is_some());
    assert_eq!(first, second);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_forwards_only_provided_fields() {
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        200, "{}",
    )));

    let response = harness
        .send(
            "PUT",
            "/v2/empresas/170571",
            json!({"nome_fantasia": "ACME", "email": null, "database_local_certificate_id": "X"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let call = harness.provider.last_call().unwrap();
    assert_eq!(call.method, ProviderMethod::Put);
    assert_eq!(call.path, "/v2/empresas/170571");
    assert_eq!(forwarded_json(&harness.provider), json!({"nome_fantasia": "ACME"}));
}

#[tokio::test]
async fn empty_update_is_rejected_without_calling_provider() {
    let harness = Harness::new(MockFiscalProvider::new());

    let response = harness.send("PUT", "/v2/empresas/170571", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error_code"], "NO_FIELDS_PROVIDED");
    assert_eq!(harness.provider.call_count(), 0);
}

#[tokio::test]
async fn certificate_update_refreshes_window_and_clears_audit_rows() {
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        200, REGISTERED,
    )));
    harness
        .repository
        .add_certificate(company("c-1"), certificate("cert-1"))
        .await;

    let response = harness
        .send(
            "PUT",
            "/v2/empresas/170571?company_id=c-1&certificate_id=cert-1",
            json!({"arquivo_certificado_base64": "TUlJ", "senha_certificado": "123"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(INTEGRATION_WARNING_HEADER).is_none());
    let calls = harness.repository.calls().await;
    assert_eq!(
        calls,
        vec!["update_certificate_window", "delete_integration_errors"]
    );
    assert!(harness.repository.certificate(&certificate("cert-1")).await.unwrap().active);
}

#[tokio::test]
async fn update_provider_error_is_relayed_verbatim() {
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        404,
        r#"{"codigo":"nao_encontrado"}"#,
    )));

    let response = harness
        .send("PUT", "/v2/empresas/999", json!({"nome": "X"}))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_bytes(response).await, br#"{"codigo":"nao_encontrado"}"#);
}

// =============================================================================
// Passthrough
// =============================================================================

#[tokio::test]
async fn list_relays_pagination_headers() {
    let harness = Harness::new(MockFiscalProvider::responding(
        ProviderResponse::new(200, "[]").with_header("x-total-count", "42"),
    ));

    let response = harness
        .app()
        .oneshot(
            Request::builder()
                .uri("/v2/empresas?cnpj=61453926000127&offset=50")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-total-count"], "42");
    assert_eq!(
        harness.provider.last_call().unwrap().query.as_deref(),
        Some("cnpj=61453926000127&offset=50")
    );
}

#[tokio::test]
async fn delete_is_forwarded() {
    let harness = Harness::new(MockFiscalProvider::responding(ProviderResponse::new(
        200, "{}",
    )));

    let response = harness
        .app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/v2/empresas/170571")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let call = harness.provider.last_call().unwrap();
    assert_eq!(call.method, ProviderMethod::Delete);
    assert_eq!(call.path, "/v2/empresas/170571");
}
