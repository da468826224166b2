//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId, ApiKeyStatus};
use crate::domain::account::AccountId;
use crate::domain::DomainError;

/// Repository trait for API key storage
///
/// `key_hash` uniqueness is the store's responsibility: `create` must fail
/// with a conflict rather than overwrite. `record_usage` must be atomic in
/// the store so concurrent validations never lose a hit.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Look up an API key by the digest of its raw secret
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// List all API keys (optionally filtered by status), newest first
    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError>;

    /// List an account's keys ordered by creation time descending
    async fn list_for_account(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ApiKey>, DomainError>;

    /// Count API keys (optionally filtered by status)
    async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError>;

    /// Count an account's keys
    async fn count_for_account(&self, account_id: &AccountId) -> Result<usize, DomainError>;

    /// Record a successful validation: set `last_used_at` to now and
    /// increment `total_hits` by one, atomically in the store
    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError>;
}
