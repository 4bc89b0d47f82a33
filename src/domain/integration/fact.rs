//! Integration facts derived from a successful provider response.
//!
//! Extraction is a pure function of the response bytes: the same body always
//! yields the same view and the same fact.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::ProviderCompanyId;

/// Certificate validity window reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CertificateWindow {
    pub effective_from: Option<DateTime<FixedOffset>>,
    pub expires_at: Option<DateTime<FixedOffset>>,
}

impl CertificateWindow {
    /// Reads `certificado_valido_de` / `certificado_valido_ate` from a provider body.
    ///
    /// Unparseable dates are logged and treated as absent.
    pub fn from_body(body: &[u8]) -> Self {
        let raw: RawCertificateDates = serde_json::from_slice(body).unwrap_or_default();
        Self {
            effective_from: parse_timestamp("certificado_valido_de", raw.valido_de.as_deref()),
            expires_at: parse_timestamp("certificado_valido_ate", raw.valido_ate.as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effective_from.is_none() && self.expires_at.is_none()
    }
}

/// Typed view over the few provider company fields this service persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCompanyView {
    pub provider_company_id: Option<ProviderCompanyId>,
    pub production_token: Option<String>,
    pub certificate_window: CertificateWindow,
}

impl ProviderCompanyView {
    /// Extracts the view from a successful provider body.
    pub fn from_body(body: &[u8]) -> Self {
        let raw: RawCompanyFields = serde_json::from_slice(body).unwrap_or_default();
        Self {
            provider_company_id: raw.id.as_ref().and_then(normalize_provider_id),
            production_token: raw.token_producao.filter(|t| !t.trim().is_empty()),
            certificate_window: CertificateWindow::from_body(body),
        }
    }

    /// Builds the persistable fact, which needs both the id and the token.
    pub fn into_fact(self) -> Option<IntegrationFact> {
        match (self.provider_company_id, self.production_token) {
            (Some(provider_company_id), Some(production_token)) => Some(IntegrationFact {
                provider_company_id,
                production_token,
                certificate_window: self.certificate_window,
            }),
            _ => None,
        }
    }
}

/// Facts written to the tenant store after a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationFact {
    pub provider_company_id: ProviderCompanyId,
    pub production_token: String,
    pub certificate_window: CertificateWindow,
}

impl IntegrationFact {
    /// Shorthand for `ProviderCompanyView::from_body(body).into_fact()`.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        ProviderCompanyView::from_body(body).into_fact()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawCompanyFields {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    token_producao: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCertificateDates {
    #[serde(default, rename = "certificado_valido_de", deserialize_with = "lenient_string")]
    valido_de: Option<String>,
    #[serde(default, rename = "certificado_valido_ate", deserialize_with = "lenient_string")]
    valido_ate: Option<String>,
}

/// Accepts only string values; anything else (numbers, objects, null) reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Normalizes the provider id from its numeric or string wire form.
///
/// Fractional numbers are truncated toward zero.
fn normalize_provider_id(value: &Value) -> Option<ProviderCompanyId> {
    let canonical = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64()?;
                if !f.is_finite() {
                    return None;
                }
                (f.trunc() as i64).to_string()
            }
        }
        Value::String(s) => s.clone(),
        _ => return None,
    };
    ProviderCompanyId::new(canonical).ok()
}

fn parse_timestamp(field: &'static str, raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(field, value = raw, error = %e, "Failed to parse provider date as RFC 3339");
            None
        }
    }
}
