//! HTTP handlers for CNPJ and municipality catalog lookups.
//!
//! All of these are stateless passthroughs: path parameters are validated,
//! then the provider response is relayed unchanged.

use axum::extract::{Path, RawQuery, State};
use axum::response::Response;

use crate::domain::catalog::{required_segment, Cnpj, MunicipalityCode};
use crate::domain::integration::IntegrationError;
use crate::ports::ProviderRequest;

use super::super::company::CompanyAppState;
use super::super::error::ApiError;
use super::super::relay::relay;

async fn forward(state: &CompanyAppState, request: ProviderRequest) -> Result<Response, ApiError> {
    let response = state.relay_handler().handle(request).await?;
    Ok(relay(response))
}

fn municipality(raw: &str) -> Result<MunicipalityCode, IntegrationError> {
    Ok(MunicipalityCode::parse(raw)?)
}

/// GET /v2/cnpjs/{cnpj}
pub async fn lookup_cnpj(
    State(state): State<CompanyAppState>,
    Path(cnpj): Path<String>,
) -> Result<Response, ApiError> {
    let cnpj = Cnpj::parse(&cnpj).map_err(IntegrationError::from)?;
    forward(&state, ProviderRequest::lookup_cnpj(&cnpj)).await
}

/// GET /v2/municipios
pub async fn list_municipalities(
    State(state): State<CompanyAppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    forward(&state, ProviderRequest::list_municipalities(query.as_deref())).await
}

/// GET /v2/municipios/{codigo_municipio}
pub async fn get_municipality(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    let code = municipality(&code)?;
    forward(&state, ProviderRequest::get_municipality(&code)).await
}

/// GET /v2/municipios/{codigo_municipio}/itens_lista_servico
pub async fn list_service_items(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let code = municipality(&code)?;
    forward(
        &state,
        ProviderRequest::list_service_items(&code, query.as_deref()),
    )
    .await
}

/// GET /v2/municipios/{codigo_municipio}/itens_lista_servico/{codigo}
pub async fn get_service_item(
    State(state): State<CompanyAppState>,
    Path((code, item)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let code = municipality(&code)?;
    let item = required_segment("codigo", &item).map_err(IntegrationError::from)?;
    forward(&state, ProviderRequest::get_service_item(&code, &item)).await
}

/// GET /v2/municipios/{codigo_municipio}/codigos_tributarios_municipio
pub async fn list_municipal_tax_codes(
    State(state): State<CompanyAppState>,
    Path(code): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let code = municipality(&code)?;
    forward(
        &state,
        ProviderRequest::list_municipal_tax_codes(&code, query.as_deref()),
    )
    .await
}

/// GET /v2/municipios/{codigo_municipio}/codigos_tributarios_municipio/{codigo}
pub async fn get_municipal_tax_code(
    State(state): State<CompanyAppState>,
    Path((code, tax_code)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let code = municipality(&code)?;
    let tax_code = required_segment("codigo", &tax_code).map_err(IntegrationError::from)?;
    forward(&state, ProviderRequest::get_municipal_tax_code(&code, &tax_code)).await
}
