//! RelayRequestHandler - Query handler for stateless provider passthrough calls.

use std::sync::Arc;

use crate::domain::integration::{IntegrationError, ProviderResponse};
use crate::ports::{FiscalProvider, ProviderRequest};

/// Forwards a single request to the provider and returns whatever it answers.
///
/// Used for list/get/delete company and the catalog lookups. Nothing is
/// persisted; provider errors are relayed as-is.
pub struct RelayRequestHandler {
    provider: Arc<dyn FiscalProvider>,
}

impl RelayRequestHandler {
    pub fn new(provider: Arc<dyn FiscalProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, request: ProviderRequest) -> Result<ProviderResponse, IntegrationError> {
        let method = request.method;
        let path = request.path.clone();

        self.provider.call(request).await.map_err(|e| {
            tracing::error!(%method, %path, error = %e, "Fiscal provider passthrough call failed");
            IntegrationError::provider_unavailable(e.to_string())
        })
    }
}
