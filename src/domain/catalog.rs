//! Validated path parameters for the provider catalog lookups.

use std::fmt;

use crate::domain::foundation::ValidationError;

/// A CNPJ in its bare 14-digit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cnpj(String);

impl Cnpj {
    pub const LENGTH: usize = 14;

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("cnpj"));
        }
        if raw.len() != Self::LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "cnpj",
                "must contain exactly 14 digits",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// IBGE municipality code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MunicipalityCode(String);

impl MunicipalityCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("codigo_municipio"));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "codigo_municipio",
                "must contain only digits",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MunicipalityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Any other non-empty path segment (company ids, catalog item codes).
///
/// The value arrives percent-decoded and is spliced into a provider path,
/// so it must stay a single segment: no separators, query or fragment
/// markers, escapes, control characters, or dot segments.
pub fn required_segment(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    if raw == "." || raw == ".." {
        return Err(ValidationError::invalid_format(
            field,
            "must not be a dot segment",
        ));
    }
    if raw
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control() || c.is_whitespace())
    {
        return Err(ValidationError::invalid_format(
            field,
            "must be a single path segment",
        ));
    }
    Ok(raw.to_string())
}
