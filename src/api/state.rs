//! Application state for shared services

use std::sync::Arc;

use crate::domain::account::{Account, AccountId, AccountRepository, AccountStatus};
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyStatus, Verdict};
use crate::domain::DomainError;
use crate::infrastructure::account::{AccountService, RegisterAccountRequest};
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::audit::AuditRecorder;
use crate::infrastructure::auth::JwtGenerator;

/// Application state containing shared services using dynamic dispatch
///
/// Constructed once at process start and cloned into every request handler;
/// there is no other shared mutable state in the process.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub audit: Arc<AuditRecorder>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        account_service: Arc<dyn AccountServiceTrait>,
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        audit: Arc<AuditRecorder>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            account_service,
            api_key_service,
            audit,
            jwt_service,
        }
    }
}

/// Trait for account service operations
#[async_trait::async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn register(
        &self,
        request: RegisterAccountRequest,
        source_addr: &str,
    ) -> Result<Account, DomainError>;
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<Account>, DomainError>;
    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Account>, DomainError>;
    async fn count(&self, status: Option<AccountStatus>) -> Result<usize, DomainError>;
    async fn toggle_status(
        &self,
        actor_id: &AccountId,
        target_id: &str,
        source_addr: &str,
    ) -> Result<Account, DomainError>;
    async fn reset_password(
        &self,
        actor_id: &AccountId,
        target_id: &str,
        source_addr: &str,
    ) -> Result<String, DomainError>;
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn validate(&self, raw_key: &str) -> Result<Verdict, DomainError>;
    async fn issue(
        &self,
        account_id: &AccountId,
        name: &str,
        expires_in_days: Option<u32>,
        source_addr: &str,
    ) -> Result<(ApiKey, String), DomainError>;
    async fn get_owned(
        &self,
        account_id: &AccountId,
        id: &str,
    ) -> Result<Option<ApiKey>, DomainError>;
    async fn list_owned(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ApiKey>, DomainError>;
    async fn count_owned(&self, account_id: &AccountId) -> Result<usize, DomainError>;
    async fn revoke_owned(
        &self,
        account_id: &AccountId,
        id: &str,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError>;
    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError>;
    async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError>;
    async fn revoke(
        &self,
        actor_id: &AccountId,
        id: &str,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError>;
    async fn delete(
        &self,
        actor_id: &AccountId,
        id: &str,
        source_addr: &str,
    ) -> Result<bool, DomainError>;
}

fn parse_account_id(id: &str) -> Result<AccountId, DomainError> {
    AccountId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn parse_key_id(id: &str) -> Result<ApiKeyId, DomainError> {
    ApiKeyId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

// Implement the traits for the actual services

#[async_trait::async_trait]
impl<R: AccountRepository + 'static> AccountServiceTrait for AccountService<R> {
    async fn register(
        &self,
        request: RegisterAccountRequest,
        source_addr: &str,
    ) -> Result<Account, DomainError> {
        AccountService::register(self, request, source_addr).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        AccountService::authenticate(self, email, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<Account>, DomainError> {
        let account_id = parse_account_id(id)?;
        AccountService::get(self, &account_id).await
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Account>, DomainError> {
        AccountService::list(self, status).await
    }

    async fn count(&self, status: Option<AccountStatus>) -> Result<usize, DomainError> {
        AccountService::count(self, status).await
    }

    async fn toggle_status(
        &self,
        actor_id: &AccountId,
        target_id: &str,
        source_addr: &str,
    ) -> Result<Account, DomainError> {
        let target_id = parse_account_id(target_id)?;
        AccountService::toggle_status(self, actor_id, &target_id, source_addr).await
    }

    async fn reset_password(
        &self,
        actor_id: &AccountId,
        target_id: &str,
        source_addr: &str,
    ) -> Result<String, DomainError> {
        let target_id = parse_account_id(target_id)?;
        AccountService::reset_password(self, actor_id, &target_id, source_addr).await
    }
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn validate(&self, raw_key: &str) -> Result<Verdict, DomainError> {
        ApiKeyService::validate(self, raw_key).await
    }

    async fn issue(
        &self,
        account_id: &AccountId,
        name: &str,
        expires_in_days: Option<u32>,
        source_addr: &str,
    ) -> Result<(ApiKey, String), DomainError> {
        let issued =
            ApiKeyService::issue(self, account_id, name, expires_in_days, source_addr).await?;
        Ok((issued.api_key, issued.secret))
    }

    async fn get_owned(
        &self,
        account_id: &AccountId,
        id: &str,
    ) -> Result<Option<ApiKey>, DomainError> {
        let key_id = parse_key_id(id)?;
        ApiKeyService::get_owned(self, account_id, &key_id).await
    }

    async fn list_owned(
        &self,
        account_id: &AccountId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list_for_account(self, account_id, limit, offset).await
    }

    async fn count_owned(&self, account_id: &AccountId) -> Result<usize, DomainError> {
        ApiKeyService::count_for_account(self, account_id).await
    }

    async fn revoke_owned(
        &self,
        account_id: &AccountId,
        id: &str,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError> {
        let key_id = parse_key_id(id)?;
        ApiKeyService::revoke_owned(self, account_id, &key_id, source_addr).await
    }

    async fn list(&self, status: Option<ApiKeyStatus>) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self, status).await
    }

    async fn count(&self, status: Option<ApiKeyStatus>) -> Result<usize, DomainError> {
        ApiKeyService::count(self, status).await
    }

    async fn revoke(
        &self,
        actor_id: &AccountId,
        id: &str,
        source_addr: &str,
    ) -> Result<ApiKey, DomainError> {
        let key_id = parse_key_id(id)?;
        ApiKeyService::revoke(self, actor_id, &key_id, source_addr).await
    }

    async fn delete(
        &self,
        actor_id: &AccountId,
        id: &str,
        source_addr: &str,
    ) -> Result<bool, DomainError> {
        let key_id = parse_key_id(id)?;
        ApiKeyService::delete(self, actor_id, &key_id, source_addr).await
    }
}
