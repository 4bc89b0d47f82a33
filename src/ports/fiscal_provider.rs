//! Fiscal provider port for outbound calls to the fiscal-document API.
//!
//! Defines the contract for the provider gateway (e.g., Focus NFe v2).
//!
//! # Design
//!
//! - **Raw transport**: The gateway never interprets status codes; callers
//!   classify the buffered [`ProviderResponse`] themselves
//! - **Fully buffered**: Bodies are read completely before returning
//! - **No retries**: One request in, one response or error out

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::catalog::{Cnpj, MunicipalityCode};
use crate::domain::integration::ProviderResponse;

/// Port for the fiscal provider gateway.
#[async_trait]
pub trait FiscalProvider: Send + Sync {
    /// Issue a single authenticated request and buffer the response.
    ///
    /// Non-2xx statuses are returned as `Ok`; only failures to obtain a
    /// response at all are errors.
    async fn call(&self, request: ProviderRequest) -> Result<ProviderResponse, GatewayError>;
}

/// HTTP methods used against the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ProviderMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderMethod::Get => "GET",
            ProviderMethod::Post => "POST",
            ProviderMethod::Put => "PUT",
            ProviderMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ProviderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the provider, relative to its base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub method: ProviderMethod,
    /// Absolute path beginning with `/v2/`.
    pub path: String,
    /// Raw query string, forwarded verbatim (without the leading `?`).
    pub query: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl ProviderRequest {
    pub fn new(method: ProviderMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    /// Attaches a raw query string. Blank strings are ignored.
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query
            .map(|q| q.trim_start_matches('?'))
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Path plus query, as it appears on the wire.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }

    // Company registration

    pub fn create_company(body: Vec<u8>) -> Self {
        Self::new(ProviderMethod::Post, "/v2/empresas").with_body(body)
    }

    pub fn list_companies(query: Option<&str>) -> Self {
        Self::new(ProviderMethod::Get, "/v2/empresas").with_query(query)
    }

    pub fn get_company(id: &str) -> Self {
        Self::new(ProviderMethod::Get, format!("/v2/empresas/{}", id))
    }

    pub fn update_company(id: &str, body: Vec<u8>) -> Self {
        Self::new(ProviderMethod::Put, format!("/v2/empresas/{}", id)).with_body(body)
    }

    pub fn delete_company(id: &str) -> Self {
        Self::new(ProviderMethod::Delete, format!("/v2/empresas/{}", id))
    }

    // Catalog lookups

    pub fn lookup_cnpj(cnpj: &Cnpj) -> Self {
        Self::new(ProviderMethod::Get, format!("/v2/cnpjs/{}", cnpj))
    }

    pub fn list_municipalities(query: Option<&str>) -> Self {
        Self::new(ProviderMethod::Get, "/v2/municipios").with_query(query)
    }

    pub fn get_municipality(code: &MunicipalityCode) -> Self {
        Self::new(ProviderMethod::Get, format!("/v2/municipios/{}", code))
    }

    pub fn list_service_items(code: &MunicipalityCode, query: Option<&str>) -> Self {
        Self::new(
            ProviderMethod::Get,
            format!("/v2/municipios/{}/itens_lista_servico", code),
        )
        .with_query(query)
    }

    pub fn get_service_item(code: &MunicipalityCode, item: &str) -> Self {
        Self::new(
            ProviderMethod::Get,
            format!("/v2/municipios/{}/itens_lista_servico/{}", code, item),
        )
    }

    pub fn list_municipal_tax_codes(code: &MunicipalityCode, query: Option<&str>) -> Self {
        Self::new(
            ProviderMethod::Get,
            format!("/v2/municipios/{}/codigos_tributarios_municipio", code),
        )
        .with_query(query)
    }

    pub fn get_municipal_tax_code(code: &MunicipalityCode, tax_code: &str) -> Self {
        Self::new(
            ProviderMethod::Get,
            format!("/v2/municipios/{}/codigos_tributarios_municipio/{}", code, tax_code),
        )
    }
}

/// Failures to obtain any response from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Base URL or token missing.
    #[error("fiscal provider is not configured: {0}")]
    Configuration(String),

    #[error("fiscal provider request timed out")]
    Timeout,

    #[error("fiscal provider transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn configuration(message: impl Into<String>) -> Self {
        GatewayError::Configuration(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport(message.into())
    }
}
