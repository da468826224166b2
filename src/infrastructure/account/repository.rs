//! In-memory account repository

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::account::{
    Account, AccountGate, AccountId, AccountRepository, AccountStatus, AccountStatusOracle,
};
use crate::domain::DomainError;

/// In-memory implementation of AccountRepository
///
/// Also serves as the account status oracle for key validation.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email() == email).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        let id = account.id().as_str().to_string();

        if accounts.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Account with ID '{}' already exists",
                id
            )));
        }

        if accounts.values().any(|a| a.email() == account.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                account.email()
            )));
        }

        accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;
        let id = account.id().as_str().to_string();

        if !accounts.contains_key(&id) {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            )));
        }

        accounts.insert(id, account.clone());
        Ok(account.clone())
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.read().await;

        let mut result: Vec<Account> = accounts
            .values()
            .filter(|a| {
                if let Some(s) = status {
                    a.status() == s
                } else {
                    true
                }
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn count(&self, status: Option<AccountStatus>) -> Result<usize, DomainError> {
        let accounts = self.accounts.read().await;

        let count = accounts
            .values()
            .filter(|a| {
                if let Some(s) = status {
                    a.status() == s
                } else {
                    true
                }
            })
            .count();

        Ok(count)
    }

    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        match accounts.get_mut(id.as_str()) {
            Some(account) => {
                account.record_login();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id
            ))),
        }
    }
}

#[async_trait]
impl AccountStatusOracle for InMemoryAccountRepository {
    async fn status_of(&self, id: &AccountId) -> Result<Option<AccountGate>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(id.as_str())
            .map(|a| AccountGate::new(a.status(), a.role())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountRole;

    fn create_test_account(id: &str, email: &str, role: AccountRole) -> Account {
        let account_id = AccountId::new(id).unwrap();
        Account::new(account_id, email, "hash", role)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("acct-1", "a@example.com", AccountRole::User);

        repo.create(account.clone()).await.unwrap();

        let retrieved = repo.get(account.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.email(), "a@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryAccountRepository::new();

        repo.create(create_test_account("acct-1", "a@example.com", AccountRole::User))
            .await
            .unwrap();

        let result = repo
            .create(create_test_account("acct-2", "a@example.com", AccountRole::User))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_status_visible_to_oracle() {
        let repo = InMemoryAccountRepository::new();
        let mut account = create_test_account("acct-1", "a@example.com", AccountRole::Admin);

        repo.create(account.clone()).await.unwrap();

        let gate = repo.status_of(account.id()).await.unwrap().unwrap();
        assert!(gate.permits_access());
        assert!(gate.role.is_admin());

        account.toggle_status();
        repo.update(&account).await.unwrap();

        let gate = repo.status_of(account.id()).await.unwrap().unwrap();
        assert!(!gate.permits_access());
    }

    #[tokio::test]
    async fn test_oracle_unknown_account() {
        let repo = InMemoryAccountRepository::new();
        let id = AccountId::new("missing").unwrap();

        assert!(repo.status_of(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_and_count_by_status() {
        let repo = InMemoryAccountRepository::new();

        let mut inactive = create_test_account("acct-1", "a@example.com", AccountRole::User);
        inactive.toggle_status();
        repo.create(inactive).await.unwrap();
        repo.create(create_test_account("acct-2", "b@example.com", AccountRole::User))
            .await
            .unwrap();

        assert_eq!(repo.count(None).await.unwrap(), 2);
        assert_eq!(repo.count(Some(AccountStatus::Active)).await.unwrap(), 1);

        let inactive = repo.list(Some(AccountStatus::Inactive)).await.unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].id().as_str(), "acct-1");
    }

    #[tokio::test]
    async fn test_record_login() {
        let repo = InMemoryAccountRepository::new();
        let account = create_test_account("acct-1", "a@example.com", AccountRole::User);

        repo.create(account.clone()).await.unwrap();
        repo.record_login(account.id()).await.unwrap();

        let retrieved = repo.get(account.id()).await.unwrap().unwrap();
        assert!(retrieved.last_login_at().is_some());
    }
}
