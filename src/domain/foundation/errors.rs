//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field } | ValidationError::InvalidFormat { field, .. } => {
                field
            }
        }
    }
}

/// Error codes exposed on the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    MissingCompanyId,
    EmptyPayload,
    InvalidPayload,
    NoFieldsProvided,

    // Provider errors
    GatewayUnavailable,
    ProviderRejected,

    // Infrastructure errors
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::MissingCompanyId => "MISSING_COMPANY_ID",
            ErrorCode::EmptyPayload => "EMPTY_PAYLOAD",
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::NoFieldsProvided => "NO_FIELDS_PROVIDED",
            ErrorCode::GatewayUnavailable => "GATEWAY_UNAVAILABLE",
            ErrorCode::ProviderRejected => "PROVIDER_REJECTED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("company_id");
        assert_eq!(format!("{}", err), "Field 'company_id' cannot be empty");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("cnpj", "expected 14 digits");
        assert_eq!(
            format!("{}", err),
            "Field 'cnpj' has invalid format: expected 14 digits"
        );
        assert_eq!(err.field(), "cnpj");
    }

    #[test]
    fn error_codes_render_screaming_snake_case() {
        assert_eq!(ErrorCode::NoFieldsProvided.to_string(), "NO_FIELDS_PROVIDED");
        assert_eq!(ErrorCode::ProviderRejected.to_string(), "PROVIDER_REJECTED");
    }
}
