//! Error responses for the HTTP boundary.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status | Body |
//! |-------|-------------|------|
//! | MissingCompanyId / Validation / Payload | 400 | `ErrorResponse` |
//! | RegistrationUnavailable / ProviderUnavailable | 502 | `ErrorResponse` |
//! | ProviderRejected | 502 | `ProviderRejectedResponse` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::integration::IntegrationError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Body returned when the provider rejects a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRejectedResponse {
    pub error_code: String,
    pub message: String,
    pub provider_status: u16,
    /// The provider's body, embedded as JSON when it parses, else as a string.
    pub provider_body: Value,
}

impl ProviderRejectedResponse {
    pub fn new(error: &IntegrationError, status: u16, body: &[u8]) -> Self {
        Self {
            error_code: error.code().to_string(),
            message: error.message(),
            provider_status: status,
            provider_body: embed_body(body),
        }
    }
}

fn embed_body(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// API error type that converts integration errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(IntegrationError);

impl ApiError {
    pub fn inner(&self) -> &IntegrationError {
        &self.0
    }
}

impl From<IntegrationError> for ApiError {
    fn from(err: IntegrationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let code = error.code().to_string();

        match &error {
            IntegrationError::ProviderRejected { status, body } => {
                let response = ProviderRejectedResponse::new(&error, *status, body);
                (StatusCode::BAD_GATEWAY, Json(response)).into_response()
            }
            IntegrationError::RegistrationUnavailable { .. }
            | IntegrationError::ProviderUnavailable { .. } => {
                let body = ErrorResponse::new(code, error.message());
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
            IntegrationError::Validation(v) => {
                let body = ErrorResponse::with_details(
                    code,
                    error.message(),
                    serde_json::json!({ "field": v.field() }),
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            IntegrationError::MissingCompanyId => {
                let body = ErrorResponse::with_details(
                    code,
                    error.message(),
                    serde_json::json!({ "field": "company_id" }),
                );
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            IntegrationError::Payload(_) => {
                let body = ErrorResponse::new(code, error.message());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}
