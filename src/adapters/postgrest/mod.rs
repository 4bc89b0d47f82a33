//! PostgREST adapters - tenant persistence over HTTP.

mod postgrest_client;
mod postgrest_integration_repository;

pub use postgrest_client::{PostgrestClient, PostgrestConfig, CLIENT_INFO, RPC_SCHEMA};
pub use postgrest_integration_repository::PostgrestIntegrationRepository;
