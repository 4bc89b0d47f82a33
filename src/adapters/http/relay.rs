//! Response relay: provider response in, axum response out.
//!
//! Status and body bytes are copied unchanged. Only the allow-listed headers
//! retained by the gateway are copied.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

use crate::domain::integration::ProviderResponse;

/// Header carrying the advisory warning on partially persisted registrations.
pub const INTEGRATION_WARNING_HEADER: &str = "x-integration-warning";

/// Relays a provider response unchanged.
pub fn relay(response: ProviderResponse) -> Response {
    relay_with_warning(response, None)
}

/// Relays a provider response, adding the advisory warning header when present.
pub fn relay_with_warning(response: ProviderResponse, warning: Option<&str>) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut relayed = Response::new(Body::from(response.body));
    *relayed.status_mut() = status;

    let headers = relayed.headers_mut();
    for (name, value) in &response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::debug!(header = %name, "Dropping provider header that is not a valid HTTP header"),
        }
    }

    if let Some(warning) = warning.filter(|w| !w.is_empty()) {
        match HeaderValue::from_str(warning) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(INTEGRATION_WARNING_HEADER), value);
            }
            Err(_) => tracing::warn!(warning, "Integration warning is not a valid header value"),
        }
    }

    relayed
}
