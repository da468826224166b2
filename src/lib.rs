//! Keygate - API key issuance and validation gateway
//!
//! Accounts mint revocable `sk_`-prefixed keys; external callers present
//! them via the `X-API-KEY` header and a validation engine decides access
//! from key state and the owning account's status. Sensitive operations are
//! written to an append-only audit log.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::StorageBackend;
use domain::account::AccountStatusOracle;
use infrastructure::account::{AccountService, Argon2Hasher, InMemoryAccountRepository, PostgresAccountRepository};
use infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository, PostgresApiKeyRepository};
use infrastructure::audit::{AuditRecorder, InMemoryAuditRepository, PostgresAuditRepository};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::storage::{self, PostgresConfig};

/// Build the application state from configuration
///
/// Repositories and services are constructed once here and injected
/// everywhere else; nothing in the crate reaches for a global handle.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        &config.auth.jwt_secret,
        config.auth.token_expiration_hours,
    )));

    let state = match config.storage.backend {
        StorageBackend::Memory => {
            let account_repo = Arc::new(InMemoryAccountRepository::new());
            let key_repo = Arc::new(InMemoryApiKeyRepository::new());
            let recorder = AuditRecorder::new(Arc::new(InMemoryAuditRepository::new()));

            let account_service = Arc::new(AccountService::new(
                Arc::clone(&account_repo),
                Arc::new(Argon2Hasher::new()),
                recorder.clone(),
            ));

            let oracle: Arc<dyn AccountStatusOracle> = account_repo;
            let api_key_service =
                Arc::new(ApiKeyService::new(key_repo, oracle, recorder.clone()));

            AppState::new(
                account_service,
                api_key_service,
                Arc::new(recorder),
                jwt_service,
            )
        }
        StorageBackend::Postgres => {
            let pg_config = PostgresConfig {
                url: config.storage.url.clone(),
                max_connections: config.storage.max_connections,
                ..PostgresConfig::default()
            };

            let pool = storage::connect(&pg_config).await?;
            storage::ensure_schema(&pool).await?;

            let account_repo = Arc::new(PostgresAccountRepository::new(pool.clone()));
            let key_repo = Arc::new(PostgresApiKeyRepository::new(pool.clone()));
            let recorder = AuditRecorder::new(Arc::new(PostgresAuditRepository::new(pool)));

            let account_service = Arc::new(AccountService::new(
                Arc::clone(&account_repo),
                Arc::new(Argon2Hasher::new()),
                recorder.clone(),
            ));

            let oracle: Arc<dyn AccountStatusOracle> = account_repo;
            let api_key_service =
                Arc::new(ApiKeyService::new(key_repo, oracle, recorder.clone()));

            AppState::new(
                account_service,
                api_key_service,
                Arc::new(recorder),
                jwt_service,
            )
        }
    };

    Ok(state)
}
