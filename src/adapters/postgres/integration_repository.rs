//! PostgreSQL implementation of IntegrationRepository.
//!
//! Writes the same tables the PostgREST backend targets, addressed through a
//! configured schema. Key columns are UUIDs; ids arrive as text and are cast
//! in SQL.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::foundation::{CertificateId, CompanyId};
use crate::domain::integration::{CertificateWindow, IntegrationErrorRecord, IntegrationFact};
use crate::ports::{IntegrationRepository, PersistenceError};

/// PostgreSQL implementation of the IntegrationRepository port.
pub struct PostgresIntegrationRepository {
    pool: PgPool,
    schema: String,
}

impl PostgresIntegrationRepository {
    /// `schema` must be a plain identifier; it is interpolated into SQL.
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    fn table(&self, name: &str) -> String {
        qualified(&self.schema, name)
    }
}

fn qualified(schema: &str, table: &str) -> String {
    format!("\"{}\".\"{}\"", schema, table)
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> PersistenceError {
    match err {
        sqlx::Error::Database(db_err) => {
            PersistenceError::backend(format!("{}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            PersistenceError::connection(format!("{}: {}", operation, err))
        }
        other => PersistenceError::backend(format!("{}: {}", operation, other)),
    }
}

#[async_trait]
impl IntegrationRepository for PostgresIntegrationRepository {
    async fn insert_integration(
        &self,
        company_id: &CompanyId,
        fact: &IntegrationFact,
    ) -> Result<(), PersistenceError> {
        let sql = format!(
            r#"
            INSERT INTO {} (company_id, focus_company_id, token_focus_company)
            VALUES ($1::uuid, $2, $3)
            "#,
            self.table("focus_integration")
        );

        sqlx::query(&sql)
            .bind(company_id.as_str())
            .bind(fact.provider_company_id.as_str())
            .bind(&fact.production_token)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert focus_integration", e))?;

        Ok(())
    }

    async fn mark_company_integrated(
        &self,
        company_id: &CompanyId,
    ) -> Result<(), PersistenceError> {
        let sql = format!(
            r#"
            UPDATE {} SET
                focus_integrated = true,
                updated_at = $2
            WHERE id = $1::uuid
            "#,
            self.table("companies")
        );

        sqlx::query(&sql)
            .bind(company_id.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update companies", e))?;

        Ok(())
    }

    async fn update_certificate_window(
        &self,
        company_id: &CompanyId,
        window: &CertificateWindow,
    ) -> Result<(), PersistenceError> {
        let sql = format!(
            r#"
            UPDATE {} SET
                effective_date = COALESCE($2, effective_date),
                expiration_date = COALESCE($3, expiration_date),
                active = true
            WHERE id = (
                SELECT certificate_access_id
                FROM {}
                WHERE company_id = $1::uuid
                LIMIT 1
            )
            "#,
            self.table("certificates_access"),
            self.table("company_certificates_access")
        );

        let result = sqlx::query(&sql)
            .bind(company_id.as_str())
            .bind(window.effective_from)
            .bind(window.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update certificates_access", e))?;

        if result.rows_affected() == 0 {
            tracing::debug!(%company_id, "No certificate associated with company");
        }

        Ok(())
    }

    async fn insert_integration_error(
        &self,
        company_id: &CompanyId,
        record: &IntegrationErrorRecord,
    ) -> Result<(), PersistenceError> {
        let sql = format!(
            r#"
            INSERT INTO {} (company_id, code, message, errors, certificates_id)
            VALUES ($1::uuid, $2, $3, $4, $5::uuid)
            "#,
            self.table("focus_integration_errors")
        );

        sqlx::query(&sql)
            .bind(company_id.as_str())
            .bind(&record.code)
            .bind(&record.message)
            .bind(&record.errors)
            .bind(record.certificate_id.as_ref().map(CertificateId::as_str))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert focus_integration_errors", e))?;

        Ok(())
    }

    async fn delete_integration_errors(
        &self,
        company_id: &CompanyId,
        certificate_id: &CertificateId,
    ) -> Result<(), PersistenceError> {
        let sql = format!(
            r#"
            DELETE FROM {}
            WHERE company_id = $1::uuid AND certificates_id = $2::uuid
            "#,
            self.table("focus_integration_errors")
        );

        let result = sqlx::query(&sql)
            .bind(company_id.as_str())
            .bind(certificate_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete focus_integration_errors", e))?;

        tracing::debug!(
            %company_id,
            %certificate_id,
            removed = result.rows_affected(),
            "Integration errors cleared"
        );

        Ok(())
    }
}
