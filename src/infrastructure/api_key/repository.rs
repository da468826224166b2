//! In-memory API key repository

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::account::AccountId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus};
use crate::domain::DomainError;

/// In-memory implementation of ApiKeyRepository
///
/// Keys are held in a map by id with a secondary hash index for O(1)
/// validation lookups. The hash index also enforces key_hash uniqueness.
/// `record_usage` mutates under a single write-lock acquisition, so
/// concurrent validations never lose a hit.
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    keys: HashMap<String, ApiKey>,
    /// key_hash -> key id
    hash_index: HashMap<String, String>,
}

impl InMemoryApiKeyRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.keys.get(id.as_str()).cloned())
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .hash_index
            .get(key_hash)
            .and_then(|id| inner.keys.get(id))
            .cloned())
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut inner = self.inner.write().await;
        let id = api_key.id().as_str().to_string();

        if inner.keys.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                id
            )));
        }

        if inner.hash_index.contains_key(api_key.key_hash()) {
            return Err(DomainError::conflict(
                "API key hash already exists".to_string(),
            ));
        }

        inner
            .hash_index
            .insert(api_key.key_hash().to_string(), id.clone());
        inner.keys.insert(id, api_key.clone());

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let mut inner = self.inner.write().await;
        let id = api_key.id().as_str().to_string();

        if !inner.keys.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id
            )));
        }

        // key_hash is immutable after creation, so the index stays in place
        inner.keys.insert(id, api_key.clone());
        Ok(api_key.clone())
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.keys.remove(id.as_str()) {
            Some(removed) => {
                inner.hash_index.remove(removed.key_hash());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError> {
        let inner = self.inner.read().await;

        let mut result: Vec<ApiKey> = inner
            .keys
            .values()
            .filter(|k| {
                if let Some(s) = status {
                    k.status() == s
                } else {
                    true
                }
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ApiKey>, DomainError> {
        let inner = self.inner.read().await;

        let mut owned: Vec<ApiKey> = inner
            .keys
            .values()
            .filter(|k| k.account_id() == account_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError> {
        let inner = self.inner.read().await;

        let count = inner
            .keys
            .values()
            .filter(|k| {
                if let Some(s) = status {
                    k.status() == s
                } else {
                    true
                }
            })
            .count();

        Ok(count)
    }

    async fn count_for_account(&self, account_id: &AccountId) -> Result<usize, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .keys
            .values()
            .filter(|k| k.account_id() == account_id)
            .count())
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;

        match inner.keys.get_mut(id.as_str()) {
            Some(key) => {
                key.record_usage();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "API key '{}' not found",
                id
            ))),
        }
    }
}
