//! Mock fiscal provider for testing.
//!
//! Provides a configurable implementation of `FiscalProvider` for unit and
//! integration tests. Supports:
//! - Queued responses (falls back to `200 {}` when the queue is empty)
//! - Error injection
//! - Call tracking

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::integration::ProviderResponse;
use crate::ports::{FiscalProvider, GatewayError, ProviderRequest};

/// Mock fiscal provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockFiscalProvider::new();
/// mock.push_response(ProviderResponse::new(201, r#"{"id":1}"#));
///
/// let response = mock.call(ProviderRequest::create_company(body)).await?;
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Default, Clone)]
pub struct MockFiscalProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<ProviderResponse>,
    next_error: Option<GatewayError>,
    call_log: Vec<ProviderRequest>,
}

impl MockFiscalProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every call with the given response.
    pub fn responding(response: ProviderResponse) -> Self {
        let mock = Self::new();
        mock.push_response(response);
        mock
    }

    /// Create a mock whose next call fails with the given error.
    pub fn failing(error: GatewayError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Queue a response. The last queued response is repeated once the queue drains.
    pub fn push_response(&self, response: ProviderResponse) {
        self.inner.lock().unwrap().responses.push_back(response);
    }

    /// Set an error to return on the next call.
    pub fn set_error(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<ProviderRequest> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }

    pub fn last_call(&self) -> Option<ProviderRequest> {
        self.inner.lock().unwrap().call_log.last().cloned()
    }
}

#[async_trait]
impl FiscalProvider for MockFiscalProvider {
    async fn call(&self, request: ProviderRequest) -> Result<ProviderResponse, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(request);

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        let response = if state.responses.len() > 1 {
            state.responses.pop_front()
        } else {
            state.responses.front().cloned()
        };
        Ok(response.unwrap_or_else(|| ProviderResponse::new(200, "{}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_response_is_empty_ok() {
        let mock = MockFiscalProvider::new();
        let response = mock.call(ProviderRequest::get_company("1")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn queued_responses_drain_then_repeat() {
        let mock = MockFiscalProvider::new();
        mock.push_response(ProviderResponse::new(201, "a"));
        mock.push_response(ProviderResponse::new(404, "b"));

        let first = mock.call(ProviderRequest::get_company("1")).await.unwrap();
        let second = mock.call(ProviderRequest::get_company("1")).await.unwrap();
        let third = mock.call(ProviderRequest::get_company("1")).await.unwrap();

        assert_eq!(first.status, 201);
        assert_eq!(second.status, 404);
        assert_eq!(third.status, 404);
    }

    #[tokio::test]
    async fn injected_error_is_returned_once() {
        let mock = MockFiscalProvider::failing(GatewayError::Timeout);
        assert!(mock.call(ProviderRequest::get_company("1")).await.is_err());
        assert!(mock.call(ProviderRequest::get_company("1")).await.is_ok());
        assert_eq!(mock.calls().len(), 2);
    }
}
