//! HTTP handlers for company endpoints.
//!
//! These handlers connect Axum routes to the application layer handlers and
//! relay provider responses back to the caller.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, RawQuery, State};
use axum::response::Response;

use crate::application::handlers::company::{
    CreateCompanyCommand, CreateCompanyHandler, RelayRequestHandler, UpdateCompanyCommand,
    UpdateCompanyHandler,
};
use crate::domain::catalog::required_segment;
use crate::domain::integration::IntegrationError;
use crate::ports::{FiscalProvider, IntegrationRepository, ProviderRequest};

use super::super::error::ApiError;
use super::super::relay::{relay, relay_with_warning};
use super::dto::{CreateCompanyParams, UpdateCompanyParams};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Built once at start-up and cloned per request.
#[derive(Clone)]
pub struct CompanyAppState {
    pub provider: Arc<dyn FiscalProvider>,
    pub repository: Arc<dyn IntegrationRepository>,
}

impl CompanyAppState {
    pub fn new(
        provider: Arc<dyn FiscalProvider>,
        repository: Arc<dyn IntegrationRepository>,
    ) -> Self {
        Self {
            provider,
            repository,
        }
    }

    pub fn create_company_handler(&self) -> CreateCompanyHandler {
        CreateCompanyHandler::new(self.provider.clone(), self.repository.clone())
    }

    pub fn update_company_handler(&self) -> UpdateCompanyHandler {
        UpdateCompanyHandler::new(self.provider.clone(), self.repository.clone())
    }

    pub fn relay_handler(&self) -> RelayRequestHandler {
        RelayRequestHandler::new(self.provider.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /v2/empresas - Register a company with the provider
pub async fn create_company(
    State(state): State<CompanyAppState>,
    Query(params): Query<CreateCompanyParams>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let handler = state.create_company_handler();
    let cmd = CreateCompanyCommand {
        company_id: params.company_id,
        body: body.to_vec(),
    };

    let result = handler.handle(cmd).await?;
    let warning = result.warning().map(str::to_string);

    Ok(relay_with_warning(result.response, warning.as_deref()))
}

/// PUT /v2/empresas/{id} - Partially update a registered company
pub async fn update_company(
    State(state): State<CompanyAppState>,
    Path(id): Path<String>,
    Query(params): Query<UpdateCompanyParams>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let handler = state.update_company_handler();
    let cmd = UpdateCompanyCommand {
        provider_company_id: id,
        company_id: params.company_id,
        certificate_id: params.certificate_id,
        body: body.to_vec(),
    };

    let result = handler.handle(cmd).await?;
    Ok(relay(result.response))
}

/// DELETE /v2/empresas/{id} - Remove a company from the provider
pub async fn delete_company(
    State(state): State<CompanyAppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = required_segment("id", &id).map_err(IntegrationError::from)?;
    let response = state
        .relay_handler()
        .handle(ProviderRequest::delete_company(&id))
        .await?;
    Ok(relay(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /v2/empresas - List companies (cnpj, cpf, offset forwarded verbatim)
pub async fn list_companies(
    State(state): State<CompanyAppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let response = state
        .relay_handler()
        .handle(ProviderRequest::list_companies(query.as_deref()))
        .await?;
    Ok(relay(response))
}

/// GET /v2/empresas/{id} - Fetch one company
pub async fn get_company(
    State(state): State<CompanyAppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = required_segment("id", &id).map_err(IntegrationError::from)?;
    let response = state
        .relay_handler()
        .handle(ProviderRequest::get_company(&id))
        .await?;
    Ok(relay(response))
}
