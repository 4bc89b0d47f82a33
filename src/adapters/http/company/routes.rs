//! Axum router configuration for company endpoints.

use axum::{routing::get, Router};

use super::handlers::{
    create_company, delete_company, get_company, list_companies, update_company, CompanyAppState,
};

/// Create the company API router.
///
/// # Routes
///
/// - `POST /v2/empresas?company_id=` - Register and reconcile
/// - `GET /v2/empresas` - List (query forwarded)
/// - `GET /v2/empresas/:id` - Fetch one
/// - `PUT /v2/empresas/:id?company_id=&certificate_id=` - Partial update
/// - `DELETE /v2/empresas/:id` - Remove
pub fn company_routes() -> Router<CompanyAppState> {
    Router::new()
        .route("/v2/empresas", get(list_companies).post(create_company))
        .route(
            "/v2/empresas/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
}
