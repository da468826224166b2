//! Account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_account_id, AccountValidationError};

/// Account identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create a new AccountId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, AccountValidationError> {
        let id = id.into();
        validate_account_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Administrative access to all accounts and keys
    Admin,
    /// Regular account, scoped to its own resources
    #[default]
    User,
}

impl AccountRole {
    /// Check if the role grants administrative access
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// Status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is active; its keys may authorize requests
    #[default]
    Active,
    /// Account is inactive; every key it owns is refused
    Inactive,
}

impl AccountStatus {
    /// Check if the account may authorize requests
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Account entity
///
/// Provider-specific signup fields (GitHub) are mapped to the typed
/// `github_id` field at the boundary; nothing else from the provider payload
/// is carried into the domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    id: AccountId,
    /// Email address, unique across accounts
    email: String,
    /// Display name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Login handle, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    /// Argon2 password hash - empty for OAuth-provisioned accounts,
    /// never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    /// GitHub account id for OAuth-linked accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    github_id: Option<String>,
    /// Role of the account
    role: AccountRole,
    /// Current status of the account
    status: AccountStatus,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
    /// Last login timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account
    pub fn new(
        id: AccountId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: AccountRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: email.into(),
            name: None,
            username: None,
            password_hash: password_hash.into(),
            github_id: None,
            role,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Rehydrate a persisted account record
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: AccountId,
        email: String,
        name: Option<String>,
        username: Option<String>,
        password_hash: String,
        github_id: Option<String>,
        role: AccountRole,
        status: AccountStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        last_login_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            username,
            password_hash,
            github_id,
            role,
            status,
            created_at,
            updated_at,
            last_login_at,
        }
    }

    /// Set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set login handle
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set linked GitHub account id
    pub fn with_github_id(mut self, github_id: impl Into<String>) -> Self {
        self.github_id = Some(github_id.into());
        self
    }

    // Getters

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn github_id(&self) -> Option<&str> {
        self.github_id.as_deref()
    }

    pub fn role(&self) -> AccountRole {
        self.role
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    // Status checks

    /// Check if the account is active
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Check if the account has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    // Mutators

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Update the status
    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        self.touch();
    }

    /// Flip the status between active and inactive, returning the new status
    pub fn toggle_status(&mut self) -> AccountStatus {
        let next = match self.status {
            AccountStatus::Active => AccountStatus::Inactive,
            AccountStatus::Inactive => AccountStatus::Active,
        };
        self.set_status(next);
        next
    }

    /// Link a GitHub account id
    pub fn link_github(&mut self, github_id: impl Into<String>) {
        self.github_id = Some(github_id.into());
        self.touch();
    }

    /// Record a login
    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
