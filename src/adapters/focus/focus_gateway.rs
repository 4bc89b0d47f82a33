//! Focus NFe gateway adapter.
//!
//! Implements the `FiscalProvider` port over the Focus NFe v2 REST API.
//!
//! # Authentication
//!
//! HTTP Basic with the API token as username and an empty password.
//!
//! # Configuration
//!
//! ```ignore
//! let config = FocusConfig::new("https://api.focusnfe.com.br", token);
//! let gateway = FocusGateway::new(config)?;
//! ```

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::integration::{ProviderResponse, RELAYED_HEADERS};
use crate::ports::{FiscalProvider, GatewayError, ProviderMethod, ProviderRequest};

/// Default request timeout for provider calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Focus NFe API configuration.
#[derive(Clone)]
pub struct FocusConfig {
    /// Base URL (e.g. `https://api.focusnfe.com.br`).
    base_url: String,

    /// API token, sent as the Basic auth username.
    api_token: SecretString,

    /// Whole-request timeout.
    timeout: Duration,
}

impl FocusConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: SecretString::new(api_token.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds the configuration from an already-secret token.
    pub fn with_secret(base_url: impl Into<String>, api_token: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout (for testing).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without surrounding whitespace or trailing slashes.
    fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    fn token(&self) -> &str {
        self.api_token.expose_secret().trim()
    }
}

impl std::fmt::Debug for FocusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Focus NFe gateway.
pub struct FocusGateway {
    config: FocusConfig,
    http_client: reqwest::Client,
}

impl FocusGateway {
    pub fn new(config: FocusConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Resolves the absolute URL and token, failing when either is blank.
    fn endpoint(&self, request: &ProviderRequest) -> Result<(String, &str), GatewayError> {
        let base_url = self.config.normalized_base_url();
        if base_url.is_empty() {
            return Err(GatewayError::configuration("base URL is not set"));
        }
        let token = self.config.token();
        if token.is_empty() {
            return Err(GatewayError::configuration("API token is not set"));
        }
        Ok((format!("{}{}", base_url, request.path_and_query()), token))
    }
}

fn to_reqwest_method(method: ProviderMethod) -> reqwest::Method {
    match method {
        ProviderMethod::Get => reqwest::Method::GET,
        ProviderMethod::Post => reqwest::Method::POST,
        ProviderMethod::Put => reqwest::Method::PUT,
        ProviderMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::transport(err.to_string())
    }
}

#[async_trait]
impl FiscalProvider for FocusGateway {
    async fn call(&self, request: ProviderRequest) -> Result<ProviderResponse, GatewayError> {
        let (url, token) = self.endpoint(&request)?;
        let method = request.method;
        let path = request.path.clone();

        let mut builder = self
            .http_client
            .request(to_reqwest_method(method), &url)
            .basic_auth(token, Option::<&str>::None)
            .header(ACCEPT, "application/json");

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            let err = map_transport_error(e);
            tracing::warn!(%method, %path, error = %err, "Fiscal provider request failed");
            err
        })?;

        let status = response.status().as_u16();
        let mut provider_response = ProviderResponse::new(status, Vec::new());
        for name in RELAYED_HEADERS {
            if let Some(value) = response.headers().get(name).and_then(|v| v.to_str().ok()) {
                provider_response.retain_header(name, value);
            }
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        provider_response.body = body.to_vec();

        tracing::debug!(
            %method,
            %path,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fiscal provider call completed"
        );

        Ok(provider_response)
    }
}
