//! API Key entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_api_key_id, ApiKeyValidationError};
use crate::domain::account::AccountId;

/// API Key identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a new ApiKeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_api_key_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiKeyId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of an API key
///
/// Expiry is derived from `expires_at` rather than stored as a status, so a
/// key is exactly one of active or revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyStatus {
    /// Key may authorize requests (subject to expiry and the owning account)
    #[default]
    Active,
    /// Key has been revoked; the transition is one-way
    Revoked,
}

impl ApiKeyStatus {
    /// Check if the key is usable
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

/// API Key entity
///
/// The raw secret is never stored: `key_hash` is its one-way digest and
/// `key_prefix` the first few characters kept in clear for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// Account that owns this key
    account_id: AccountId,
    /// User-chosen label
    name: String,
    /// SHA-256 hex digest of the raw secret; unique across keys
    key_hash: String,
    /// First 10 characters of the raw secret, for display only
    key_prefix: String,
    /// Current status of the key
    status: ApiKeyStatus,
    /// Expiration timestamp (None = never expires)
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    /// Last time the key passed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
    /// Number of successful validations; monotonically non-decreasing
    total_hits: u64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new API key
    pub fn new(
        id: ApiKeyId,
        account_id: AccountId,
        name: impl Into<String>,
        key_hash: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            account_id,
            name: name.into(),
            key_hash: key_hash.into(),
            key_prefix: key_prefix.into(),
            status: ApiKeyStatus::Active,
            expires_at: None,
            last_used_at: None,
            total_hits: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set expiration
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Rehydrate a persisted key record
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ApiKeyId,
        account_id: AccountId,
        name: String,
        key_hash: String,
        key_prefix: String,
        status: ApiKeyStatus,
        expires_at: Option<DateTime<Utc>>,
        last_used_at: Option<DateTime<Utc>>,
        total_hits: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            name,
            key_hash,
            key_prefix,
            status,
            expires_at,
            last_used_at,
            total_hits,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_hash(&self) -> &str {
        &self.key_hash
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn status(&self) -> ApiKeyStatus {
        self.status
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Status checks

    /// Check if the key has expired (a None expiry never expires)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }

    /// Check if the key has been revoked
    pub fn is_revoked(&self) -> bool {
        self.status == ApiKeyStatus::Revoked
    }

    /// Check if the key itself is valid: active and unexpired.
    /// The owning account's status is checked separately during validation.
    pub fn is_valid(&self) -> bool {
        self.status.is_usable() && !self.is_expired()
    }

    // Mutators

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Revoke the key. One-way: revoking an already-revoked key is a no-op.
    pub fn revoke(&mut self) {
        if self.status == ApiKeyStatus::Revoked {
            return;
        }
        self.status = ApiKeyStatus::Revoked;
        self.touch();
    }

    /// Record a successful validation
    pub fn record_usage(&mut self) {
        self.last_used_at = Some(Utc::now());
        self.total_hits += 1;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_key(id: &str, name: &str) -> ApiKey {
        let key_id = ApiKeyId::new(id).unwrap();
        let account_id = AccountId::new("acct-1").unwrap();
        ApiKey::new(key_id, account_id, name, "digest", "sk_1234567")
    }

    #[test]
    fn test_api_key_id_valid() {
        let id = ApiKeyId::new("key-1").unwrap();
        assert_eq!(id.as_str(), "key-1");
    }

    #[test]
    fn test_api_key_id_invalid() {
        assert!(ApiKeyId::new("").is_err());
        assert!(ApiKeyId::new("my_key").is_err());
    }

    #[test]
    fn test_api_key_status() {
        assert!(ApiKeyStatus::Active.is_usable());
        assert!(!ApiKeyStatus::Revoked.is_usable());
    }

    #[test]
    fn test_api_key_creation() {
        let key = create_test_key("key-1", "Test Key");

        assert_eq!(key.name(), "Test Key");
        assert_eq!(key.key_prefix(), "sk_1234567");
        assert_eq!(key.account_id().as_str(), "acct-1");
        assert_eq!(key.total_hits(), 0);
        assert!(key.is_valid());
        assert!(!key.is_expired());
        assert!(key.last_used_at().is_none());
    }

    #[test]
    fn test_api_key_expiration() {
        let past = Utc::now() - chrono::Duration::hours(1);
        let key = create_test_key("key-1", "Test Key").with_expiration(past);

        assert!(key.is_expired());
        assert!(!key.is_valid());
    }

    #[test]
    fn test_api_key_future_expiration() {
        let future = Utc::now() + chrono::Duration::days(30);
        let key = create_test_key("key-1", "Test Key").with_expiration(future);

        assert!(!key.is_expired());
        assert!(key.is_valid());
    }

    #[test]
    fn test_api_key_revoke() {
        let mut key = create_test_key("key-1", "Test Key");

        assert!(key.is_valid());

        key.revoke();
        assert!(key.is_revoked());
        assert!(!key.is_valid());
    }

    #[test]
    fn test_api_key_revoke_is_idempotent() {
        let mut key = create_test_key("key-1", "Test Key");

        key.revoke();
        let updated = key.updated_at();

        key.revoke();
        assert!(key.is_revoked());
        assert_eq!(key.updated_at(), updated);
    }

    #[test]
    fn test_api_key_record_usage() {
        let mut key = create_test_key("key-1", "Test Key");

        key.record_usage();
        key.record_usage();

        assert_eq!(key.total_hits(), 2);
        assert!(key.last_used_at().is_some());
    }

    #[test]
    fn test_revoked_key_can_still_be_expired() {
        let past = Utc::now() - chrono::Duration::days(1);
        let mut key = create_test_key("key-1", "Test Key").with_expiration(past);

        key.revoke();
        assert!(key.is_expired());
        assert!(key.is_revoked());
    }
}
