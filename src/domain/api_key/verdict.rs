//! Validation verdict types
//!
//! Authorization outcomes are values, never errors: a denial travels as
//! `Verdict::Denied`, while a storage failure travels as `DomainError` so the
//! boundary can always tell "key invalid" apart from "storage unavailable".

use serde::{Deserialize, Serialize};

use super::entity::ApiKeyId;
use crate::domain::account::{AccountId, AccountRole};

/// Reason a validation was denied
///
/// The display strings form the wire contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    /// No key was presented
    MissingKey,
    /// No key record matches the presented secret
    InvalidKey,
    /// The key's expiry timestamp has passed
    Expired,
    /// The key has been revoked
    Revoked,
    /// The owning account is absent or inactive
    AccountInactive,
}

impl AuthFailure {
    /// The fixed caller-facing error string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingKey => "Missing API Key",
            Self::InvalidKey => "Invalid API Key",
            Self::Expired => "API Key Expired",
            Self::Revoked => "API Key Revoked",
            Self::AccountInactive => "User Inactive - API Access Denied",
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGrant {
    /// The validated key
    pub key_id: ApiKeyId,
    /// The account that owns the key
    pub account_id: AccountId,
    /// The owning account's role
    pub role: AccountRole,
}

/// Outcome of validating a raw key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The key authorizes access on behalf of its owning account
    Valid(KeyGrant),
    /// The key does not authorize access
    Denied(AuthFailure),
}

impl Verdict {
    /// Create a valid verdict
    pub fn valid(key_id: ApiKeyId, account_id: AccountId, role: AccountRole) -> Self {
        Self::Valid(KeyGrant {
            key_id,
            account_id,
            role,
        })
    }

    /// Create a denied verdict
    pub fn denied(failure: AuthFailure) -> Self {
        Self::Denied(failure)
    }

    /// Check if the verdict grants access
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The grant, if access was allowed
    pub fn grant(&self) -> Option<&KeyGrant> {
        match self {
            Self::Valid(grant) => Some(grant),
            Self::Denied(_) => None,
        }
    }

    /// The failure, if access was denied
    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            Self::Valid(_) => None,
            Self::Denied(failure) => Some(*failure),
        }
    }
}
