//! API Key service
//!
//! High-level key lifecycle operations: issuance, owner-scoped management,
//! administrative revocation and deletion, and validation via the engine.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::account::{AccountId, AccountStatusOracle};
use crate::domain::api_key::{
    validate_key_name, ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus, Verdict,
};
use crate::domain::audit::AuditAction;
use crate::domain::DomainError;

use super::generator::KeyGenerator;
use super::validator::ValidationEngine;
use crate::infrastructure::audit::AuditRecorder;

/// Default lifetime of a newly issued key, in days
pub const DEFAULT_EXPIRES_IN_DAYS: u32 = 30;

/// Result of issuing a new API key
///
/// `secret` is the only copy of the raw key that will ever exist; it is not
/// retrievable after this value is dropped.
#[derive(Debug)]
pub struct IssuedKey {
    /// The persisted key record (hash + metadata, no secret)
    pub api_key: ApiKey,
    /// The full raw secret, returned exactly once
    pub secret: String,
}

/// API Key service
#[derive(Debug)]
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    engine: ValidationEngine<R>,
    generator: KeyGenerator,
    audit: AuditRecorder,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    /// Create a new API key service
    pub fn new(
        repository: Arc<R>,
        accounts: Arc<dyn AccountStatusOracle>,
        audit: AuditRecorder,
    ) -> Self {
        let engine = ValidationEngine::new(Arc::clone(&repository), accounts);

        Self {
            repository,
            engine,
            generator: KeyGenerator::standard(),
            audit,
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: KeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Issue a new key for an account
    ///
    /// The raw secret in the returned `IssuedKey` is shown to the caller
    /// exactly once and cannot be recovered afterwards.
    pub async fn issue(
        &self,
        account_id: &AccountId,
        name: &str,
        expires_in_days: Option<u32>,
        source_addr: &str,
    ) -> Result<IssuedKey, DomainError> {
        validate_key_name(name).map_err(|e| DomainError::validation(e.to_string()))?;

        let days = expires_in_days.unwrap_or(DEFAULT_EXPIRES_IN_DAYS);

        if days == 0 {
            return Err(DomainError::validation(
                "expires_in_days must be a positive integer",
            ));
        }

        let id = ApiKeyId::new(Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        info!(key_id = %id, account_id = %account_id, "Issuing API key");

        let generated = self.generator.generate();

        let api_key = ApiKey::new(
            id.clone(),
            account_id.clone(),
            name,
            &generated.hash,
            &generated.prefix,
        )
        .with_expiration(Utc::now() + Duration::days(days as i64));

        let created = self.repository.create(api_key).await?;

        self.audit
            .record(
                AuditAction::KeyIssued,
                account_id,
                Some(id.as_str()),
                format!("API key '{}' issued, expires in {} days", name, days),
                source_addr,
            )
            .await;

        Ok(IssuedKey {
            api_key: created,
            secret: generated.secret,
        })
    }

    /// Validate a raw key and return the authorization verdict
    pub async fn validate(&self, raw_key: &str) -> Result<Verdict, DomainError> {
        self.engine.validate(raw_key).await
    }

    /// Get a key owned by the given account
    pub async fn get_owned(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
    ) -> Result<Option<ApiKey>, DomainError> {
        let key = self.repository.get(id).await?;
        Ok(key.filter(|k| k.account_id() == account_id))
    }

    /// List an account's keys, newest first
    pub async fn list_for_account(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ApiKey>, DomainError> {
        self.repository
            .list_for_account(account_id, limit, offset)
            .await
    }

    /// Count an account's keys
    pub async fn count_for_account(&self, account_id: &AccountId) -> Result<usize, DomainError> {
        self.repository.count_for_account(account_id).await
    }

    /// Revoke a key owned by the given account
    ///
    /// Revoking an already-revoked key is a no-op and still succeeds.
    pub async fn revoke_owned(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError> {
        let key = self
            .get_owned(account_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        self.revoke_key(key, account_id, source_addr).await
    }

    /// Revoke any key (administrative)
    pub async fn revoke(
        &self,
        actor_id: &AccountId,
        id: &ApiKeyId,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError> {
        let key = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        self.revoke_key(key, actor_id, source_addr).await
    }

    async fn revoke_key(
        &self,
        mut key: ApiKey,
        actor_id: &AccountId,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError> {
        if key.is_revoked() {
            return Ok(key);
        }

        info!(key_id = %key.id(), "Revoking API key");

        key.revoke();
        let updated = self.repository.update(&key).await?;

        self.audit
            .record(
                AuditAction::KeyRevoked,
                actor_id,
                Some(key.id().as_str()),
                format!("API key '{}' revoked", key.name()),
                source_addr,
            )
            .await;

        Ok(updated)
    }

    /// Hard-delete a key (administrative); independent of revocation
    pub async fn delete(
        &self,
        actor_id: &AccountId,
        id: &ApiKeyId,
        source_addr: &str,
    ) -> Result<bool, DomainError> {
        info!(key_id = %id, "Deleting API key");

        let deleted = self.repository.delete(id).await?;

        if deleted {
            self.audit
                .record(
                    AuditAction::KeyDeleted,
                    actor_id,
                    Some(id.as_str()),
                    format!("API key '{}' deleted", id),
                    source_addr,
                )
                .await;
        }

        Ok(deleted)
    }

    /// Get any key by ID (administrative)
    pub async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.repository.get(id).await
    }

    /// List all keys (administrative)
    pub async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list(status).await
    }

    /// Count all keys
    pub async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError> {
        self.repository.count(status).await
    }
}
