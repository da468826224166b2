//! PostgreSQL API key repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::account::AccountId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "id, account_id, name, key_hash, key_prefix, status, \
     expires_at, last_used_at, total_hits, created_at, updated_at";

/// PostgreSQL implementation of ApiKeyRepository
///
/// The unique index on key_hash backs the store-level uniqueness guarantee;
/// `record_usage` relies on a single UPDATE so the hit counter increments
/// atomically under concurrency.
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_api_key(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE key_hash = $1",
            SELECT_COLUMNS
        ))
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to look up API key: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_api_key(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, account_id, name, key_hash, key_prefix, status,
                                  expires_at, last_used_at, total_hits, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(api_key.id().as_str())
        .bind(api_key.account_id().as_str())
        .bind(api_key.name())
        .bind(api_key.key_hash())
        .bind(api_key.key_prefix())
        .bind(api_key.status().as_str())
        .bind(api_key.expires_at())
        .bind(api_key.last_used_at())
        .bind(api_key.total_hits() as i64)
        .bind(api_key.created_at())
        .bind(api_key.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("key_hash") {
                    DomainError::conflict("API key hash already exists".to_string())
                } else {
                    DomainError::conflict(format!(
                        "API key with ID '{}' already exists",
                        api_key.id().as_str()
                    ))
                }
            } else {
                DomainError::storage(format!("Failed to create API key: {}", e))
            }
        })?;

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET name = $2, status = $3, expires_at = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(api_key.id().as_str())
        .bind(api_key.name())
        .bind(api_key.status().as_str())
        .bind(api_key.expires_at())
        .bind(api_key.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update API key: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                api_key.id().as_str()
            )));
        }

        Ok(api_key.clone())
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM api_keys WHERE status = $1 ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .bind(s.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM api_keys ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        let mut keys = Vec::with_capacity(rows.len());

        for row in rows {
            keys.push(row_to_api_key(&row)?);
        }

        Ok(keys)
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ApiKey>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE account_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            SELECT_COLUMNS
        ))
        .bind(account_id.as_str())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list account keys: {}", e)))?;

        let mut keys = Vec::with_capacity(rows.len());

        for row in rows {
            keys.push(row_to_api_key(&row)?);
        }

        Ok(keys)
    }

    async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError> {
        let count: i64 = match status {
            Some(s) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM api_keys WHERE status = $1")
                    .bind(s.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM api_keys")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count API keys: {}", e)))?;

        Ok(count as usize)
    }

    async fn count_for_account(&self, account_id: &AccountId) -> Result<usize, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM api_keys WHERE account_id = $1")
                .bind(account_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to count account keys: {}", e))
                })?;

        Ok(count as usize)
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        // Single-statement increment keeps the counter exact under concurrency
        let result = sqlx::query(
            "UPDATE api_keys SET last_used_at = NOW(), total_hits = total_hits + 1 WHERE id = $1",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record key usage: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id.as_str()
            )));
        }

        Ok(())
    }
}

fn row_to_api_key(row: &sqlx::postgres::PgRow) -> Result<ApiKey, DomainError> {
    let id: String = row.get("id");
    let account_id: String = row.get("account_id");
    let status: String = row.get("status");
    let total_hits: i64 = row.get("total_hits");

    let key_id = ApiKeyId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid API key ID in database: {}", e)))?;
    let account_id = AccountId::new(&account_id)
        .map_err(|e| DomainError::storage(format!("Invalid account ID in database: {}", e)))?;

    Ok(ApiKey::restore(
        key_id,
        account_id,
        row.get("name"),
        row.get("key_hash"),
        row.get("key_prefix"),
        str_to_status(&status),
        row.get("expires_at"),
        row.get("last_used_at"),
        total_hits as u64,
        row.get("created_at"),
        row.get("updated_at"),
    ))
}

fn str_to_status(s: &str) -> ApiKeyStatus {
    match s {
        "revoked" => ApiKeyStatus::Revoked,
        _ => ApiKeyStatus::Active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(ApiKeyStatus::Active.as_str(), "active");
        assert_eq!(ApiKeyStatus::Revoked.as_str(), "revoked");

        assert_eq!(str_to_status("active"), ApiKeyStatus::Active);
        assert_eq!(str_to_status("revoked"), ApiKeyStatus::Revoked);
        assert_eq!(str_to_status("unknown"), ApiKeyStatus::Active);
    }
}
