//! In-memory adapters.

mod in_memory_integration_repository;

pub use in_memory_integration_repository::{
    InMemoryIntegrationRepository, StoredCertificate, StoredCompany, StoredIntegration,
    StoredIntegrationError,
};
