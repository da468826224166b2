//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::account::{
    Account, AccountGate, AccountId, AccountRepository, AccountRole, AccountStatus,
    AccountStatusOracle,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "id, email, name, username, password_hash, github_id, role, \
     status, created_at, updated_at, last_login_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn get(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE email = $1",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account by email: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, name, username, password_hash, github_id,
                                  role, status, created_at, updated_at, last_login_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.id().as_str())
        .bind(account.email())
        .bind(account.name())
        .bind(account.username())
        .bind(account.password_hash())
        .bind(account.github_id())
        .bind(account.role().as_str())
        .bind(account.status().as_str())
        .bind(account.created_at())
        .bind(account.updated_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("email") {
                    DomainError::conflict(format!("Email '{}' already exists", account.email()))
                } else {
                    DomainError::conflict(format!(
                        "Account with ID '{}' already exists",
                        account.id().as_str()
                    ))
                }
            } else {
                DomainError::storage(format!("Failed to create account: {}", e))
            }
        })?;

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, name = $3, username = $4, password_hash = $5, github_id = $6,
                role = $7, status = $8, updated_at = $9, last_login_at = $10
            WHERE id = $1
            "#,
        )
        .bind(account.id().as_str())
        .bind(account.email())
        .bind(account.name())
        .bind(account.username())
        .bind(account.password_hash())
        .bind(account.github_id())
        .bind(account.role().as_str())
        .bind(account.status().as_str())
        .bind(account.updated_at())
        .bind(account.last_login_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update account: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                account.id().as_str()
            )));
        }

        Ok(account.clone())
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<Account>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM accounts WHERE status = $1 ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .bind(s.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM accounts ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list accounts: {}", e)))?;

        let mut accounts = Vec::with_capacity(rows.len());

        for row in rows {
            accounts.push(row_to_account(&row)?);
        }

        Ok(accounts)
    }

    async fn count(&self, status: Option<AccountStatus>) -> Result<usize, DomainError> {
        let count: i64 = match status {
            Some(s) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE status = $1")
                    .bind(s.as_str())
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to count accounts: {}", e)))?;

        Ok(count as usize)
    }

    async fn record_login(&self, id: &AccountId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record login: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Account '{}' not found",
                id.as_str()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl AccountStatusOracle for PostgresAccountRepository {
    async fn status_of(&self, id: &AccountId) -> Result<Option<AccountGate>, DomainError> {
        // Projects only the gate columns; the validation engine has no
        // business reading anything else.
        let row = sqlx::query("SELECT status, role FROM accounts WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get account status: {}", e)))?;

        match row {
            Some(row) => {
                let status: String = row.get("status");
                let role: String = row.get("role");
                Ok(Some(AccountGate::new(
                    str_to_status(&status),
                    str_to_role(&role),
                )))
            }
            None => Ok(None),
        }
    }
}

fn row_to_account(row: &sqlx::postgres::PgRow) -> Result<Account, DomainError> {
    let id: String = row.get("id");
    let role: String = row.get("role");
    let status: String = row.get("status");

    let account_id = AccountId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid account ID in database: {}", e)))?;

    Ok(Account::restore(
        account_id,
        row.get("email"),
        row.get("name"),
        row.get("username"),
        row.get("password_hash"),
        row.get("github_id"),
        str_to_role(&role),
        str_to_status(&status),
        row.get("created_at"),
        row.get("updated_at"),
        row.get("last_login_at"),
    ))
}

fn str_to_status(s: &str) -> AccountStatus {
    match s {
        "inactive" => AccountStatus::Inactive,
        _ => AccountStatus::Active,
    }
}

fn str_to_role(s: &str) -> AccountRole {
    match s {
        "admin" => AccountRole::Admin,
        _ => AccountRole::User,
    }
}
