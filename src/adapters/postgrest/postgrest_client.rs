//! Thin PostgREST client.
//!
//! Every request carries the service key twice (`apikey` and bearer token),
//! selects the schema through `Accept-Profile`/`Content-Profile`, and
//! identifies itself with `X-Client-Info`.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::ports::PersistenceError;

/// Value sent in `X-Client-Info`.
pub const CLIENT_INFO: &str = "fiscal-bridge";

/// Schema used for RPC calls regardless of the table schema.
pub const RPC_SCHEMA: &str = "public";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for a PostgREST endpoint.
#[derive(Clone)]
pub struct PostgrestConfig {
    base_url: String,
    api_key: SecretString,
    schema: String,
    timeout: Duration,
}

impl PostgrestConfig {
    pub fn new(base_url: impl Into<String>, api_key: SecretString, schema: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            schema: schema.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }
}

impl std::fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("schema", &self.schema)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the tenant's PostgREST API.
pub struct PostgrestClient {
    config: PostgrestConfig,
    http_client: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(config: PostgrestConfig) -> Result<Self, PersistenceError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PersistenceError::backend(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim().trim_end_matches('/')
    }

    fn request(&self, method: Method, url: String, profile: &str) -> RequestBuilder {
        let key = self.config.api_key.expose_secret();
        self.http_client
            .request(method, url)
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .header("Accept-Profile", profile)
            .header("Content-Profile", profile)
            .header("X-Client-Info", CLIENT_INFO)
            .header(ACCEPT, "application/json")
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url(), table)
    }

    /// `POST /rest/v1/<table>` with a single row.
    pub async fn insert(&self, table: &str, row: &Value) -> Result<(), PersistenceError> {
        let builder = self
            .request(Method::POST, self.table_url(table), self.config.schema())
            .header("Prefer", "return=minimal")
            .json(row);
        self.send(builder, table).await.map(|_| ())
    }

    /// `PATCH /rest/v1/<table>?<filters>`.
    pub async fn update(
        &self,
        table: &str,
        filters: &[(&str, String)],
        changes: &Value,
    ) -> Result<(), PersistenceError> {
        let builder = self
            .request(Method::PATCH, self.table_url(table), self.config.schema())
            .query(filters)
            .header("Prefer", "return=minimal")
            .json(changes);
        self.send(builder, table).await.map(|_| ())
    }

    /// `GET /rest/v1/<table>?<filters>`, decoded as a JSON array of rows.
    pub async fn select(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<Value>, PersistenceError> {
        let builder = self
            .request(Method::GET, self.table_url(table), self.config.schema())
            .query(filters);
        let body = self.send(builder, table).await?;
        serde_json::from_slice(&body)
            .map_err(|e| PersistenceError::decode(format!("{}: {}", table, e)))
    }

    /// `DELETE /rest/v1/<table>?<filters>`.
    pub async fn delete(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<(), PersistenceError> {
        let builder = self
            .request(Method::DELETE, self.table_url(table), self.config.schema())
            .query(filters)
            .header("Prefer", "return=minimal");
        self.send(builder, table).await.map(|_| ())
    }

    /// `POST /rest/v1/rpc/<name>` under the `public` profile.
    pub async fn rpc(&self, name: &str, args: &Value) -> Result<Vec<u8>, PersistenceError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url(), name);
        let builder = self
            .request(Method::POST, url, RPC_SCHEMA)
            .header(CONTENT_TYPE, "application/json")
            .json(args);
        self.send(builder, name).await
    }

    async fn send(&self, builder: RequestBuilder, target: &str) -> Result<Vec<u8>, PersistenceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| PersistenceError::connection(format!("{}: {}", target, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PersistenceError::connection(format!("{}: {}", target, e)))?;

        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).trim().to_string();
            return Err(PersistenceError::rejected(status.as_u16(), message));
        }

        Ok(body.to_vec())
    }
}

/// PostgREST equality filter value (`eq.<value>`).
pub fn eq(value: &str) -> String {
    format!("eq.{}", value)
}
