//! Key validation engine
//!
//! Orchestrates the authorization decision for a presented raw key:
//! digest, store lookup, expiry check, revocation check, account gate,
//! usage update. Checks short-circuit in that order, and the usage update
//! is the only mutation - it runs only after every check has passed.

use std::sync::Arc;

use tracing::{debug, warn};

use super::hasher::KeyHasher;
use crate::domain::account::AccountStatusOracle;
use crate::domain::api_key::{ApiKeyRepository, AuthFailure, Verdict};
use crate::domain::DomainError;

/// The validation engine
///
/// Denials are returned as `Verdict::Denied`; only storage failures on the
/// read path surface as `Err`, so callers can always separate "key invalid"
/// from "storage unavailable".
#[derive(Debug)]
pub struct ValidationEngine<R>
where
    R: ApiKeyRepository,
{
    keys: Arc<R>,
    accounts: Arc<dyn AccountStatusOracle>,
    hasher: KeyHasher,
}

impl<R: ApiKeyRepository> ValidationEngine<R> {
    /// Create a new validation engine
    pub fn new(keys: Arc<R>, accounts: Arc<dyn AccountStatusOracle>) -> Self {
        Self {
            keys,
            accounts,
            hasher: KeyHasher::new(),
        }
    }

    /// Validate a raw key and return the authorization verdict
    pub async fn validate(&self, raw_key: &str) -> Result<Verdict, DomainError> {
        let digest = self.hasher.digest(raw_key);

        let key = match self.keys.find_by_hash(&digest).await? {
            Some(key) => key,
            None => {
                debug!("No key record matches presented secret");
                return Ok(Verdict::denied(AuthFailure::InvalidKey));
            }
        };

        if key.is_expired() {
            debug!(key_id = %key.id(), "Key expired");
            return Ok(Verdict::denied(AuthFailure::Expired));
        }

        if !key.status().is_usable() {
            debug!(key_id = %key.id(), "Key revoked");
            return Ok(Verdict::denied(AuthFailure::Revoked));
        }

        let gate = match self.accounts.status_of(key.account_id()).await? {
            Some(gate) if gate.permits_access() => gate,
            _ => {
                debug!(key_id = %key.id(), account_id = %key.account_id(),
                       "Owning account absent or inactive");
                return Ok(Verdict::denied(AuthFailure::AccountInactive));
            }
        };

        // Best-effort usage stats: a failure here must not revoke the access
        // this request already earned.
        if let Err(e) = self.keys.record_usage(key.id()).await {
            warn!(key_id = %key.id(), error = %e, "Failed to record key usage");
        }

        debug!(key_id = %key.id(), account_id = %key.account_id(), "Key validated");

        Ok(Verdict::valid(
            key.id().clone(),
            key.account_id().clone(),
            gate.role,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::account::{
        AccountGate, AccountId, AccountRole, AccountStatus, MockAccountStatusOracle,
    };
    use crate::domain::api_key::{ApiKey, ApiKeyId, MockApiKeyRepository};
    use crate::infrastructure::api_key::generator::KeyGenerator;

    struct Fixture {
        engine: ValidationEngine<MockApiKeyRepository>,
        keys: Arc<MockApiKeyRepository>,
        oracle: Arc<MockAccountStatusOracle>,
        account_id: AccountId,
    }

    async fn fixture() -> Fixture {
        let keys = Arc::new(MockApiKeyRepository::new());
        let oracle = Arc::new(MockAccountStatusOracle::new());
        let oracle_dyn: Arc<dyn AccountStatusOracle> = oracle.clone();
        let account_id = AccountId::new("acct-1").unwrap();

        oracle
            .set_gate(
                &account_id,
                AccountGate::new(AccountStatus::Active, AccountRole::User),
            )
            .await;

        Fixture {
            engine: ValidationEngine::new(Arc::clone(&keys), oracle_dyn),
            keys,
            oracle,
            account_id,
        }
    }

    async fn issue_key(fx: &Fixture, secret: &str, expires_at: Option<chrono::DateTime<Utc>>) -> ApiKey {
        let generated = KeyGenerator::standard().from_secret(secret);

        let mut key = ApiKey::new(
            ApiKeyId::new(format!("key-{}", fx.keys.count(None).await.unwrap())).unwrap(),
            fx.account_id.clone(),
            "Test Key",
            generated.hash,
            generated.prefix,
        );

        if let Some(expires_at) = expires_at {
            key = key.with_expiration(expires_at);
        }

        fx.keys.create(key.clone()).await.unwrap();
        key
    }

    #[tokio::test]
    async fn test_unknown_key_is_invalid() {
        let fx = fixture().await;

        let verdict = fx.engine.validate("sk_never_issued").await.unwrap();

        assert_eq!(verdict.failure(), Some(AuthFailure::InvalidKey));
    }

    #[tokio::test]
    async fn test_issued_key_is_valid() {
        let fx = fixture().await;
        issue_key(&fx, "sk_secret_1", None).await;

        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();

        assert!(verdict.is_valid());
        let grant = verdict.grant().unwrap();
        assert_eq!(grant.account_id, fx.account_id);
        assert_eq!(grant.role, AccountRole::User);
    }

    #[tokio::test]
    async fn test_expired_key_denied_regardless_of_status() {
        let fx = fixture().await;
        let key = issue_key(&fx, "sk_secret_1", Some(Utc::now() - Duration::days(1))).await;

        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();
        assert_eq!(verdict.failure(), Some(AuthFailure::Expired));

        // Expiry wins even once the key is also revoked
        let mut revoked = key.clone();
        revoked.revoke();
        fx.keys.update(&revoked).await.unwrap();

        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();
        assert_eq!(verdict.failure(), Some(AuthFailure::Expired));
    }

    #[tokio::test]
    async fn test_revoked_key_denied_when_unexpired() {
        let fx = fixture().await;
        let mut key = issue_key(&fx, "sk_secret_1", Some(Utc::now() + Duration::days(30))).await;

        key.revoke();
        fx.keys.update(&key).await.unwrap();

        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();
        assert_eq!(verdict.failure(), Some(AuthFailure::Revoked));
    }

    #[tokio::test]
    async fn test_inactive_account_denies_active_key() {
        let fx = fixture().await;
        let key = issue_key(&fx, "sk_secret_1", None).await;

        fx.oracle
            .set_gate(
                &fx.account_id,
                AccountGate::new(AccountStatus::Inactive, AccountRole::User),
            )
            .await;

        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();
        assert_eq!(verdict.failure(), Some(AuthFailure::AccountInactive));

        // The key record itself is untouched
        let stored = fx.keys.get(key.id()).await.unwrap().unwrap();
        assert!(stored.is_valid());
        assert_eq!(stored.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_unknown_account_denies() {
        let fx = fixture().await;

        let other = AccountId::new("acct-ghost").unwrap();
        let generated = KeyGenerator::standard().from_secret("sk_orphan");
        let key = ApiKey::new(
            ApiKeyId::new("key-orphan").unwrap(),
            other,
            "Orphan",
            generated.hash,
            generated.prefix,
        );
        fx.keys.create(key).await.unwrap();

        let verdict = fx.engine.validate("sk_orphan").await.unwrap();
        assert_eq!(verdict.failure(), Some(AuthFailure::AccountInactive));
    }

    #[tokio::test]
    async fn test_success_records_usage() {
        let fx = fixture().await;
        let key = issue_key(&fx, "sk_secret_1", None).await;

        fx.engine.validate("sk_secret_1").await.unwrap();
        fx.engine.validate("sk_secret_1").await.unwrap();

        let stored = fx.keys.get(key.id()).await.unwrap().unwrap();
        assert_eq!(stored.total_hits(), 2);
        assert!(stored.last_used_at().is_some());
    }

    #[tokio::test]
    async fn test_denied_validation_never_mutates() {
        let fx = fixture().await;
        let mut key = issue_key(&fx, "sk_secret_1", None).await;

        key.revoke();
        fx.keys.update(&key).await.unwrap();

        fx.engine.validate("sk_secret_1").await.unwrap();

        let stored = fx.keys.get(key.id()).await.unwrap().unwrap();
        assert_eq!(stored.total_hits(), 0);
        assert!(stored.last_used_at().is_none());
    }

    #[tokio::test]
    async fn test_usage_failure_still_grants_access() {
        let fx = fixture().await;
        issue_key(&fx, "sk_secret_1", None).await;

        fx.keys.set_usage_should_fail(true).await;

        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();
        assert!(verdict.is_valid());
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error_not_a_denial() {
        let fx = fixture().await;
        issue_key(&fx, "sk_secret_1", None).await;

        fx.keys.set_should_fail(true).await;

        let result = fx.engine.validate("sk_secret_1").await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_oracle_failure_is_an_error_not_a_denial() {
        let fx = fixture().await;
        issue_key(&fx, "sk_secret_1", None).await;

        fx.oracle.set_should_fail(true).await;

        let result = fx.engine.validate("sk_secret_1").await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_expiry_window_boundaries() {
        let fx = fixture().await;
        issue_key(&fx, "sk_secret_1", Some(Utc::now() + Duration::days(30))).await;

        // Well inside the window
        let verdict = fx.engine.validate("sk_secret_1").await.unwrap();
        assert!(verdict.is_valid());

        let fx2 = fixture().await;
        issue_key(&fx2, "sk_secret_2", Some(Utc::now() - Duration::days(1))).await;

        let verdict = fx2.engine.validate("sk_secret_2").await.unwrap();
        assert_eq!(verdict.failure(), Some(AuthFailure::Expired));
    }

    #[tokio::test]
    async fn test_concurrent_validations_count_every_hit() {
        let fx = fixture().await;
        let key = issue_key(&fx, "sk_secret_1", None).await;

        let oracle: Arc<dyn AccountStatusOracle> = fx.oracle.clone();
        let engine = Arc::new(ValidationEngine::new(Arc::clone(&fx.keys), oracle));

        let mut handles = Vec::new();

        for _ in 0..20 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                let verdict = engine.validate("sk_secret_1").await.unwrap();
                assert!(verdict.is_valid());
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let stored = fx.keys.get(key.id()).await.unwrap().unwrap();
        assert_eq!(stored.total_hits(), 20);
    }
}
