//! Request DTOs for company endpoints.
//!
//! Bodies are not modelled here; they are opaque provider payloads handled by
//! the payload sanitizer.

use serde::Deserialize;

/// Query parameters for `POST /v2/empresas`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCompanyParams {
    /// Tenant company id. Required, checked by the handler.
    pub company_id: Option<String>,
}

/// Query parameters for `PUT /v2/empresas/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompanyParams {
    pub company_id: Option<String>,
    /// Tenant certificate id whose stale errors are cleared on success.
    pub certificate_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_params_tolerate_missing_company_id() {
        let params: CreateCompanyParams = serde_json::from_str("{}").unwrap();
        assert!(params.company_id.is_none());
    }

    #[test]
    fn update_params_deserialize_both_ids() {
        let params: UpdateCompanyParams =
            serde_json::from_str(r#"{"company_id":"c1","certificate_id":"k1"}"#).unwrap();
        assert_eq!(params.company_id.as_deref(), Some("c1"));
        assert_eq!(params.certificate_id.as_deref(), Some("k1"));
    }
}
