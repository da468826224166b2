//! PostgreSQL audit repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::account::AccountId;
use crate::domain::audit::{AuditAction, AuditEntry, AuditRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of AuditRepository
///
/// The table only ever receives INSERTs; there is no UPDATE or DELETE path.
#[derive(Debug, Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append(&self, entry: AuditEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, action, actor_id, target_id, details, source_addr, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id())
        .bind(entry.action().as_str())
        .bind(entry.actor_id().as_str())
        .bind(entry.target_id())
        .bind(entry.details())
        .bind(entry.source_addr())
        .bind(entry.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append audit entry: {}", e)))?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, action, actor_id, target_id, details, source_addr, created_at
            FROM audit_log
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list audit entries: {}", e)))?;

        let mut entries = Vec::with_capacity(rows.len());

        for row in rows {
            entries.push(row_to_entry(&row)?);
        }

        Ok(entries)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count audit entries: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_entry(row: &sqlx::postgres::PgRow) -> Result<AuditEntry, DomainError> {
    let action: String = row.get("action");
    let actor_id: String = row.get("actor_id");

    let action = AuditAction::parse(&action).ok_or_else(|| {
        DomainError::storage(format!("Unknown audit action in database: {}", action))
    })?;
    let actor_id = AccountId::new(&actor_id)
        .map_err(|e| DomainError::storage(format!("Invalid actor ID in database: {}", e)))?;

    Ok(AuditEntry::restore(
        row.get("id"),
        action,
        actor_id,
        row.get("target_id"),
        row.get("details"),
        row.get("source_addr"),
        row.get("created_at"),
    ))
}
