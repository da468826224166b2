//! Audit entry entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountId;

/// Symbolic tag of an audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// An account was switched to active
    AccountActivated,
    /// An account was switched to inactive
    AccountDeactivated,
    /// An account's password was reset by an administrator
    PasswordReset,
    /// A new account was registered
    AccountRegistered,
    /// An API key was issued
    KeyIssued,
    /// An API key was revoked
    KeyRevoked,
    /// An API key was hard-deleted
    KeyDeleted,
}

impl AuditAction {
    /// The stored tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountActivated => "USER_ACTIVATED",
            Self::AccountDeactivated => "USER_DEACTIVATED",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::AccountRegistered => "USER_REGISTERED",
            Self::KeyIssued => "KEY_ISSUED",
            Self::KeyRevoked => "KEY_REVOKED",
            Self::KeyDeleted => "KEY_DELETED",
        }
    }

    /// Parse a stored tag string
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "USER_ACTIVATED" => Some(Self::AccountActivated),
            "USER_DEACTIVATED" => Some(Self::AccountDeactivated),
            "PASSWORD_RESET" => Some(Self::PasswordReset),
            "USER_REGISTERED" => Some(Self::AccountRegistered),
            "KEY_ISSUED" => Some(Self::KeyIssued),
            "KEY_REVOKED" => Some(Self::KeyRevoked),
            "KEY_DELETED" => Some(Self::KeyDeleted),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single, immutable audit entry
///
/// Entries expose getters only; there is no mutation or deletion surface
/// anywhere in the crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for the entry
    id: String,
    /// What happened
    action: AuditAction,
    /// Account that performed the action
    actor_id: AccountId,
    /// Account or key the action was applied to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    target_id: Option<String>,
    /// Free-text description
    details: String,
    /// Source address of the request that triggered the action
    source_addr: String,
    /// When the action happened
    created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create a new audit entry stamped with the current time
    pub fn new(
        id: impl Into<String>,
        action: AuditAction,
        actor_id: AccountId,
        target_id: Option<String>,
        details: impl Into<String>,
        source_addr: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            action,
            actor_id,
            target_id,
            details: details.into(),
            source_addr: source_addr.into(),
            created_at: Utc::now(),
        }
    }

    /// Rehydrate a persisted entry
    pub fn restore(
        id: String,
        action: AuditAction,
        actor_id: AccountId,
        target_id: Option<String>,
        details: String,
        source_addr: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            action,
            actor_id,
            target_id,
            details,
            source_addr,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn actor_id(&self) -> &AccountId {
        &self.actor_id
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn source_addr(&self) -> &str {
        &self.source_addr
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
