//! Payload sanitizer for inbound company create/update bodies.
//!
//! Provider payloads are large and change often, so they are handled as
//! generic JSON objects. Only the handful of keys this service cares about are
//! inspected:
//!
//! - `database_local_certificate_id` is tenant-internal. It is captured (for
//!   audit bookkeeping) and always stripped before the body is forwarded.
//! - On update, keys set to `null` mean "not provided" and are dropped so the
//!   provider never receives them.
//! - On update, `arquivo_certificado_base64` / `senha_certificado` mark the
//!   request as touching certificate material.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::foundation::CertificateId;

/// Tenant-internal certificate reference carried in create payloads.
pub const CERTIFICATE_REF_FIELD: &str = "database_local_certificate_id";

/// Provider field holding the base64 certificate file.
pub const CERTIFICATE_FILE_FIELD: &str = "arquivo_certificado_base64";

/// Provider field holding the certificate password.
pub const CERTIFICATE_PASSWORD_FIELD: &str = "senha_certificado";

/// Reasons an inbound payload cannot be forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("JSON payload is required")]
    EmptyPayload,

    #[error("Invalid JSON payload: {reason}")]
    InvalidPayload { reason: String },

    #[error("No fields provided for update")]
    NoFieldsProvided,
}

impl PayloadError {
    fn invalid(reason: impl Into<String>) -> Self {
        PayloadError::InvalidPayload {
            reason: reason.into(),
        }
    }
}

/// Sanitized body for a company registration.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCompanyPayload {
    fields: Map<String, Value>,
    certificate_ref: Option<CertificateId>,
}

impl CreateCompanyPayload {
    /// Parses the raw body, extracting and stripping the certificate reference.
    pub fn sanitize(raw: &[u8]) -> Result<Self, PayloadError> {
        let mut fields = parse_object(raw)?;
        let certificate_ref = take_certificate_ref(&mut fields);
        Ok(Self {
            fields,
            certificate_ref,
        })
    }

    /// Certificate reference captured from the inbound body, if any.
    pub fn certificate_ref(&self) -> Option<&CertificateId> {
        self.certificate_ref.as_ref()
    }

    /// Fields that will be forwarded to the provider.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialized forwardable body.
    pub fn to_bytes(&self) -> Vec<u8> {
        serialize(&self.fields)
    }
}

/// Sanitized body for a company update, with omit-if-absent semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCompanyPayload {
    fields: Map<String, Value>,
}

impl UpdateCompanyPayload {
    /// Parses the raw body, dropping absent (`null`) fields.
    ///
    /// Fails with [`PayloadError::NoFieldsProvided`] when nothing is left to send.
    pub fn sanitize(raw: &[u8]) -> Result<Self, PayloadError> {
        let mut fields = parse_object(raw)?;
        take_certificate_ref(&mut fields);
        fields.retain(|_, value| !value.is_null());

        if fields.is_empty() {
            return Err(PayloadError::NoFieldsProvided);
        }
        Ok(Self { fields })
    }

    /// Whether the update replaces the certificate file or its password.
    pub fn touches_certificate(&self) -> bool {
        self.fields.contains_key(CERTIFICATE_FILE_FIELD)
            || self.fields.contains_key(CERTIFICATE_PASSWORD_FIELD)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serialize(&self.fields)
    }
}

fn parse_object(raw: &[u8]) -> Result<Map<String, Value>, PayloadError> {
    if raw.is_empty() {
        return Err(PayloadError::EmptyPayload);
    }
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(PayloadError::invalid("expected a JSON object")),
        Err(e) => Err(PayloadError::invalid(e.to_string())),
    }
}

/// Removes the certificate reference key, returning it when it held a usable string.
fn take_certificate_ref(fields: &mut Map<String, Value>) -> Option<CertificateId> {
    match fields.remove(CERTIFICATE_REF_FIELD) {
        Some(Value::String(s)) => CertificateId::new(s).ok(),
        _ => None,
    }
}

fn serialize(fields: &Map<String, Value>) -> Vec<u8> {
    Value::Object(fields.clone()).to_string().into_bytes()
}
