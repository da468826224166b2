//! Account status oracle
//!
//! Read-only lookup of the gate an account places on its API keys. Consumed
//! exclusively by the validation engine; never mutates.

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{AccountId, AccountRole, AccountStatus};
use crate::domain::DomainError;

/// The authorization-relevant slice of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountGate {
    pub status: AccountStatus,
    pub role: AccountRole,
}

impl AccountGate {
    pub fn new(status: AccountStatus, role: AccountRole) -> Self {
        Self { status, role }
    }

    /// Check if the account currently permits its keys to authorize
    pub fn permits_access(&self) -> bool {
        self.status.is_active()
    }
}

/// Read-only status/role lookup for key validation
#[async_trait]
pub trait AccountStatusOracle: Send + Sync + Debug {
    /// Look up the gate for an account, or None if the account is unknown
    async fn status_of(&self, id: &AccountId) -> Result<Option<AccountGate>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock oracle for testing the validation engine in isolation
    #[derive(Debug, Default)]
    pub struct MockAccountStatusOracle {
        gates: Arc<RwLock<HashMap<String, AccountGate>>>,
        should_fail: Arc<RwLock<bool>>,
    }

    impl MockAccountStatusOracle {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a gate for an account
        pub async fn set_gate(&self, id: &AccountId, gate: AccountGate) {
            self.gates.write().await.insert(id.as_str().to_string(), gate);
        }

        /// Set whether lookups should fail
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }
    }

    #[async_trait]
    impl AccountStatusOracle for MockAccountStatusOracle {
        async fn status_of(&self, id: &AccountId) -> Result<Option<AccountGate>, DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("Mock oracle configured to fail"));
            }
            Ok(self.gates.read().await.get(id.as_str()).copied())
        }
    }
}
