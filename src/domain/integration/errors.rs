//! Integration workflow error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | MissingCompanyId | 400 |
//! | Validation | 400 |
//! | Payload | 400 |
//! | RegistrationUnavailable | 502 |
//! | ProviderUnavailable | 502 |
//! | ProviderRejected | 502 |

use crate::domain::foundation::{ErrorCode, ValidationError};

use super::payload::PayloadError;

/// Message returned when a registration could not reach the provider.
pub const REGISTRATION_UNAVAILABLE_MESSAGE: &str =
    "Company registered, but the fiscal provider integration failed. Please try again later.";

/// Message returned when the provider rejected a registration.
pub const REGISTRATION_REJECTED_MESSAGE: &str =
    "Company registered, but the fiscal provider rejected the integration. Check the data and try again.";

/// Errors surfaced by the integration workflows.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// The `company_id` query parameter was missing or blank.
    MissingCompanyId,

    /// A path or query parameter failed validation.
    Validation(ValidationError),

    /// The inbound body could not be sanitized.
    Payload(PayloadError),

    /// The provider could not be reached while registering a company.
    RegistrationUnavailable { reason: String },

    /// The provider could not be reached for any other operation.
    ProviderUnavailable { reason: String },

    /// The provider answered a registration with a non-success status.
    ProviderRejected { status: u16, body: Vec<u8> },
}

impl IntegrationError {
    pub fn registration_unavailable(reason: impl Into<String>) -> Self {
        IntegrationError::RegistrationUnavailable {
            reason: reason.into(),
        }
    }

    pub fn provider_unavailable(reason: impl Into<String>) -> Self {
        IntegrationError::ProviderUnavailable {
            reason: reason.into(),
        }
    }

    pub fn provider_rejected(status: u16, body: impl Into<Vec<u8>>) -> Self {
        IntegrationError::ProviderRejected {
            status,
            body: body.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            IntegrationError::MissingCompanyId => ErrorCode::MissingCompanyId,
            IntegrationError::Validation(_) => ErrorCode::ValidationFailed,
            IntegrationError::Payload(PayloadError::EmptyPayload) => ErrorCode::EmptyPayload,
            IntegrationError::Payload(PayloadError::InvalidPayload { .. }) => {
                ErrorCode::InvalidPayload
            }
            IntegrationError::Payload(PayloadError::NoFieldsProvided) => {
                ErrorCode::NoFieldsProvided
            }
            IntegrationError::RegistrationUnavailable { .. }
            | IntegrationError::ProviderUnavailable { .. } => ErrorCode::GatewayUnavailable,
            IntegrationError::ProviderRejected { .. } => ErrorCode::ProviderRejected,
        }
    }

    /// Returns a caller-facing error message.
    ///
    /// Transport details are never part of the message; they are logged instead.
    pub fn message(&self) -> String {
        match self {
            IntegrationError::MissingCompanyId => "company_id is required".to_string(),
            IntegrationError::Validation(e) => e.to_string(),
            IntegrationError::Payload(e) => e.to_string(),
            IntegrationError::RegistrationUnavailable { .. } => {
                REGISTRATION_UNAVAILABLE_MESSAGE.to_string()
            }
            IntegrationError::ProviderUnavailable { .. } => {
                "Failed to reach the fiscal provider".to_string()
            }
            IntegrationError::ProviderRejected { .. } => REGISTRATION_REJECTED_MESSAGE.to_string(),
        }
    }

    /// True for errors caused by the inbound request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IntegrationError::MissingCompanyId
                | IntegrationError::Validation(_)
                | IntegrationError::Payload(_)
        )
    }
}

impl std::fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationError::RegistrationUnavailable { reason }
            | IntegrationError::ProviderUnavailable { reason } => {
                write!(f, "{} ({})", self.message(), reason)
            }
            IntegrationError::ProviderRejected { status, .. } => {
                write!(f, "{} (provider status {})", self.message(), status)
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for IntegrationError {}

impl From<PayloadError> for IntegrationError {
    fn from(err: PayloadError) -> Self {
        IntegrationError::Payload(err)
    }
}

impl From<ValidationError> for IntegrationError {
    fn from(err: ValidationError) -> Self {
        IntegrationError::Validation(err)
    }
}
