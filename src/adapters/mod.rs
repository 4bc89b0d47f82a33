//! Adapters - implementations of the ports.
//!
//! - `focus` - Focus NFe fiscal provider gateway (plus a scripted mock)
//! - `http` - axum REST API
//! - `memory` - In-process integration repository
//! - `postgres` - Direct SQL integration repository
//! - `postgrest` - PostgREST integration repository

pub mod focus;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod postgrest;
