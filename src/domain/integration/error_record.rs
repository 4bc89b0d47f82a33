//! Audit record for provider-rejected registrations.

use serde::Deserialize;
use serde_json::Value;

use super::payload::CERTIFICATE_FILE_FIELD;
use crate::domain::foundation::CertificateId;

/// Error envelope returned by the provider on rejection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub mensagem: Option<String>,
    #[serde(default)]
    pub erros: Value,
}

impl ProviderErrorBody {
    /// Parses the envelope. Returns `None` when the body is not a JSON object
    /// of that shape.
    pub fn parse(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(body).ok()? {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }

    /// True when any error item names the certificate file field.
    pub fn mentions_certificate(&self) -> bool {
        self.erros
            .as_array()
            .map(|items| {
                items.iter().any(|item| {
                    item.get("campo").and_then(Value::as_str) == Some(CERTIFICATE_FILE_FIELD)
                })
            })
            .unwrap_or(false)
    }
}

/// Row written to the integration-error audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationErrorRecord {
    pub code: Option<String>,
    pub message: Option<String>,
    /// Raw error-item list as returned by the provider.
    pub errors: Value,
    pub certificate_id: Option<CertificateId>,
}

impl IntegrationErrorRecord {
    /// Builds the record from a parsed provider error.
    ///
    /// The certificate reference is attached only when the provider blamed the
    /// certificate file and the caller supplied a reference.
    pub fn from_provider_error(
        body: ProviderErrorBody,
        certificate_ref: Option<&CertificateId>,
    ) -> Self {
        let certificate_id = if body.mentions_certificate() {
            certificate_ref.cloned()
        } else {
            None
        };
        Self {
            code: body.codigo,
            message: body.mensagem,
            errors: body.erros,
            certificate_id,
        }
    }
}
