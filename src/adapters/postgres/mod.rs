//! PostgreSQL adapters - direct SQL persistence through a sqlx pool.

mod integration_repository;

pub use integration_repository::PostgresIntegrationRepository;
