//! Account repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Account, AccountId, AccountStatus};
use crate::domain::DomainError;

/// Repository trait for account storage
#[async_trait]
pub trait AccountRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Get an account by its email address
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Create a new account
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// List all accounts (optionally filtered by status), newest first
    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Account>, DomainError>;

    /// Count accounts (optionally filtered by status)
    async fn count(&self, status: Option<AccountStatus>) -> Result<usize, DomainError>;

    /// Check if an email address is already taken
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    /// Record a login for an account
    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError>;
}
