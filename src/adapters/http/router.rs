//! Application router: all endpoints plus the cross-cutting tower layers.

use std::time::Duration;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::catalog::catalog_routes;
use super::company::{company_routes, CompanyAppState};
use super::health::health_routes;
use super::relay::INTEGRATION_WARNING_HEADER;

/// Headers the browser is allowed to read from responses.
const EXPOSED_HEADERS: [&str; 5] = [
    "x-total-count",
    "rate-limit-limit",
    "rate-limit-remaining",
    "rate-limit-reset",
    INTEGRATION_WARNING_HEADER,
];

/// Build the full application router with state applied.
///
/// Layer order (outermost first): request-id generation, request-id
/// propagation, tracing, CORS.
pub fn app_router(state: CompanyAppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(company_routes())
        .merge(catalog_routes())
        .with_state(state)
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// CORS for the tenant front-end.
///
/// A single `*` origin allows any origin without credentials; otherwise only
/// the listed origins are allowed, with credentials.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let is_wildcard = origins.len() == 1 && origins[0] == "*";
    let exposed: Vec<HeaderName> = EXPOSED_HEADERS
        .into_iter()
        .map(HeaderName::from_static)
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .expose_headers(exposed)
        .max_age(Duration::from_secs(300));

    if is_wildcard {
        return layer.allow_origin(Any).allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
