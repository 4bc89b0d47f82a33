//! Strongly-typed identifiers used by the integration domain.
//!
//! Tenant-side identifiers are opaque strings owned by the tenant data store
//! (usually UUIDs, but never parsed as such here). The provider-side company
//! identifier is normalized to its canonical decimal/string form.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

/// Defines a non-blank string identifier with the standard accessors.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting blank input.
            ///
            /// Surrounding whitespace is trimmed.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Parses an optional raw value, treating blank as absent.
            pub fn from_optional(raw: Option<&str>) -> Option<Self> {
                raw.and_then(|s| Self::new(s).ok())
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Tenant company identifier (`companies.id`).
    CompanyId,
    "company_id"
);

string_id!(
    /// Tenant certificate reference (`company_certificates_access` / `certificates_access` id).
    CertificateId,
    "certificate_id"
);

string_id!(
    /// Company identifier assigned by the fiscal provider.
    ///
    /// The provider may send the id as a JSON number or string; both are
    /// stored as the same canonical string.
    ProviderCompanyId,
    "provider_company_id"
);
