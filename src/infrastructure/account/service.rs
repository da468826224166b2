//! Account service
//!
//! Registration, authentication, and the administrative operations that gate
//! accounts (status toggles, password resets). Every mutation writes an
//! audit entry.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::domain::account::{
    validate_email, validate_password, Account, AccountId, AccountRepository, AccountRole,
    AccountStatus,
};
use crate::domain::audit::AuditAction;
use crate::domain::DomainError;

use super::password::PasswordHasher;
use crate::infrastructure::audit::AuditRecorder;

/// Length of generated temporary passwords
const TEMP_PASSWORD_LEN: usize = 12;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Account service
#[derive(Debug)]
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
    hasher: Arc<dyn PasswordHasher>,
    audit: AuditRecorder,
}

impl<R: AccountRepository> AccountService<R> {
    /// Create a new account service
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<dyn PasswordHasher>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            repository,
            hasher,
            audit,
        }
    }

    /// Register a new account
    pub async fn register(
        &self,
        request: RegisterAccountRequest,
        source_addr: &str,
    ) -> Result<Account, DomainError> {
        validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&request.email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                request.email
            )));
        }

        let id = AccountId::new(Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(e.to_string()))?;

        info!(account_id = %id, "Registering account");

        let password_hash = self.hasher.hash(&request.password)?;

        let mut account = Account::new(id.clone(), &request.email, password_hash, request.role);

        if let Some(name) = request.name {
            account = account.with_name(name);
        }

        if let Some(username) = request.username {
            account = account.with_username(username);
        }

        let created = self.repository.create(account).await?;

        self.audit
            .record(
                AuditAction::AccountRegistered,
                &id,
                Some(id.as_str()),
                format!("Account {} registered", created.email()),
                source_addr,
            )
            .await;

        Ok(created)
    }

    /// Authenticate with email and password
    ///
    /// Returns None for unknown email, wrong password, or an inactive
    /// account - the caller cannot tell which.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, DomainError> {
        let account = match self.repository.get_by_email(email).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        if !account.is_active() {
            return Ok(None);
        }

        if !self.hasher.verify(password, account.password_hash()) {
            return Ok(None);
        }

        self.repository.record_login(account.id()).await?;

        self.repository.get(account.id()).await
    }

    /// Get an account by ID
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        self.repository.get(id).await
    }

    /// List accounts, newest first
    pub async fn list(
        &self,
        status: Option<AccountStatus>,
    ) -> Result<Vec<Account>, DomainError> {
        self.repository.list(status).await
    }

    /// Count accounts
    pub async fn count(&self, status: Option<AccountStatus>) -> Result<usize, DomainError> {
        self.repository.count(status).await
    }

    /// Flip an account between active and inactive (administrative)
    ///
    /// Deactivation instantly invalidates every key the account owns, without
    /// touching the key records.
    pub async fn toggle_status(
        &self,
        actor_id: &AccountId,
        target_id: &AccountId,
        source_addr: &str,
    ) -> Result<Account, DomainError> {
        let mut account = self
            .repository
            .get(target_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", target_id)))?;

        let new_status = account.toggle_status();
        let updated = self.repository.update(&account).await?;

        info!(account_id = %target_id, status = new_status.as_str(), "Account status toggled");

        let action = match new_status {
            AccountStatus::Active => AuditAction::AccountActivated,
            AccountStatus::Inactive => AuditAction::AccountDeactivated,
        };

        self.audit
            .record(
                action,
                actor_id,
                Some(target_id.as_str()),
                format!(
                    "Account {} status changed to {}",
                    updated.email(),
                    new_status.as_str()
                ),
                source_addr,
            )
            .await;

        Ok(updated)
    }

    /// Reset an account's password to a generated temporary one
    /// (administrative)
    ///
    /// The temporary password is returned exactly once and never stored in
    /// clear.
    pub async fn reset_password(
        &self,
        actor_id: &AccountId,
        target_id: &AccountId,
        source_addr: &str,
    ) -> Result<String, DomainError> {
        let mut account = self
            .repository
            .get(target_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account '{}' not found", target_id)))?;

        let temp_password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TEMP_PASSWORD_LEN)
            .map(char::from)
            .collect();

        let password_hash = self.hasher.hash(&temp_password)?;
        account.set_password_hash(password_hash);

        self.repository.update(&account).await?;

        info!(account_id = %target_id, "Password reset");

        self.audit
            .record(
                AuditAction::PasswordReset,
                actor_id,
                Some(target_id.as_str()),
                format!("Password reset for account {}", target_id),
                source_addr,
            )
            .await;

        Ok(temp_password)
    }
}
