//! Axum router configuration for catalog endpoints.

use axum::{routing::get, Router};

use super::super::company::CompanyAppState;
use super::handlers::{
    get_municipal_tax_code, get_municipality, get_service_item, list_municipal_tax_codes,
    list_municipalities, list_service_items, lookup_cnpj,
};

/// Create the catalog API router.
///
/// # Routes
///
/// - `GET /v2/cnpjs/:cnpj`
/// - `GET /v2/municipios`
/// - `GET /v2/municipios/:codigo_municipio`
/// - `GET /v2/municipios/:codigo_municipio/itens_lista_servico[/:codigo]`
/// - `GET /v2/municipios/:codigo_municipio/codigos_tributarios_municipio[/:codigo]`
pub fn catalog_routes() -> Router<CompanyAppState> {
    Router::new()
        .route("/v2/cnpjs/:cnpj", get(lookup_cnpj))
        .route("/v2/municipios", get(list_municipalities))
        .route("/v2/municipios/:codigo_municipio", get(get_municipality))
        .route(
            "/v2/municipios/:codigo_municipio/itens_lista_servico",
            get(list_service_items),
        )
        .route(
            "/v2/municipios/:codigo_municipio/itens_lista_servico/:codigo",
            get(get_service_item),
        )
        .route(
            "/v2/municipios/:codigo_municipio/codigos_tributarios_municipio",
            get(list_municipal_tax_codes),
        )
        .route(
            "/v2/municipios/:codigo_municipio/codigos_tributarios_municipio/:codigo",
            get(get_municipal_tax_code),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::adapters::focus::MockFiscalProvider;
    use crate::adapters::memory::InMemoryIntegrationRepository;
    use crate::domain::integration::ProviderResponse;
    use crate::ports::GatewayError;

    fn app(provider: &MockFiscalProvider) -> Router {
        let state = CompanyAppState::new(
            Arc::new(provider.clone()),
            Arc::new(InMemoryIntegrationRepository::new()),
        );
        catalog_routes().with_state(state)
    }

    async fn send_get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn valid_cnpj_is_forwarded() {
        let provider = MockFiscalProvider::responding(ProviderResponse::new(200, "{}"));

        let response = send_get(app(&provider), "/v2/cnpjs/61453926000127").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(provider.last_call().unwrap().path, "/v2/cnpjs/61453926000127");
    }

    #[tokio::test]
    async fn malformed_cnpj_is_rejected_before_forwarding() {
        let provider = MockFiscalProvider::new();

        let response = send_get(app(&provider), "/v2/cnpjs/6145392600012").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_code"], "VALIDATION_FAILED");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn non_numeric_municipality_is_rejected() {
        let provider = MockFiscalProvider::new();

        let response = send_get(app(&provider), "/v2/municipios/curitiba/itens_lista_servico").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn nested_catalog_routes_are_forwarded() {
        let provider = MockFiscalProvider::new();

        send_get(
            app(&provider),
            "/v2/municipios/4106902/codigos_tributarios_municipio/010700100?x=1",
        )
        .await;

        assert_eq!(
            provider.last_call().unwrap().path,
            "/v2/municipios/4106902/codigos_tributarios_municipio/010700100"
        );
    }

    #[tokio::test]
    async fn list_forwards_query() {
        let provider = MockFiscalProvider::new();

        send_get(app(&provider), "/v2/municipios?sigla_uf=PR&offset=100").await;

        assert_eq!(
            provider.last_call().unwrap().query.as_deref(),
            Some("sigla_uf=PR&offset=100")
        );
    }

    #[tokio::test]
    async fn gateway_failure_is_bad_gateway() {
        let provider = MockFiscalProvider::failing(GatewayError::Timeout);

        let response = send_get(app(&provider), "/v2/municipios/4106902").await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn item_code_cannot_leave_its_segment() {
        let provider = MockFiscalProvider::new();

        for uri in [
            "/v2/municipios/4106902/itens_lista_servico/..%2F..%2Fempresas",
            "/v2/municipios/4106902/codigos_tributarios_municipio/1%3Fx%3D1",
        ] {
            let response = send_get(app(&provider), uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
        assert_eq!(provider.call_count(), 0);
    }
}
