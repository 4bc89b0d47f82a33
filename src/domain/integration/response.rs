//! Buffered provider responses and their status-class classification.

/// Provider headers relayed back to the caller, in relay order.
pub const RELAYED_HEADERS: [&str; 5] = [
    "Content-Type",
    "X-Total-Count",
    "Rate-Limit-Limit",
    "Rate-Limit-Remaining",
    "Rate-Limit-Reset",
];

/// A fully buffered response from the fiscal provider.
///
/// Only the allow-listed headers are retained; everything else the provider
/// sends is dropped at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ProviderResponse {
    /// Creates a response with no retained headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header if it belongs to the relay allow-list.
    ///
    /// Blank values are ignored so that relaying never emits empty headers.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.retain_header(name, value);
        self
    }

    /// In-place variant of [`ProviderResponse::with_header`].
    pub fn retain_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        if let Some(canonical) = RELAYED_HEADERS
            .iter()
            .find(|h| h.eq_ignore_ascii_case(name))
        {
            self.headers.retain(|(n, _)| n != canonical);
            self.headers.push((canonical.to_string(), value));
        }
    }

    /// Looks up a retained header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Classifies the response into success or provider error.
    pub fn classify(self) -> ProviderOutcome {
        if self.is_success() {
            ProviderOutcome::Success(self)
        } else {
            ProviderOutcome::ProviderError(self)
        }
    }
}

/// Status-class branch of a provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The provider accepted the request (2xx).
    Success(ProviderResponse),
    /// The provider rejected the request (any non-2xx status).
    ProviderError(ProviderResponse),
}

impl ProviderOutcome {
    /// The underlying response, whichever branch it landed in.
    pub fn response(&self) -> &ProviderResponse {
        match self {
            ProviderOutcome::Success(r) | ProviderOutcome::ProviderError(r) => r,
        }
    }

    pub fn into_response(self) -> ProviderResponse {
        match self {
            ProviderOutcome::Success(r) | ProviderOutcome::ProviderError(r) => r,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProviderOutcome::Success(_))
    }
}
