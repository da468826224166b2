//! Account management admin endpoints

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::auth::AccountResponse;
use crate::api::middleware::{client_addr, RequireAdmin};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

/// List accounts response
#[derive(Debug, Serialize)]
pub struct ListAccountsResponse {
    pub accounts: Vec<AccountResponse>,
    pub total: usize,
}

/// Password reset response; the temporary password appears exactly once
#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordResetResponse {
    pub account_id: String,
    pub temp_password: String,
}

/// GET /admin/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
) -> Result<Json<ListAccountsResponse>, ApiError> {
    debug!(admin = %auth.identifier(), "Admin listing accounts");

    let accounts = state
        .account_service
        .list(None)
        .await
        .map_err(ApiError::from)?;

    let responses: Vec<AccountResponse> = accounts
        .iter()
        .map(AccountResponse::from_account)
        .collect();
    let total = responses.len();

    Ok(Json(ListAccountsResponse {
        accounts: responses,
        total,
    }))
}

/// GET /admin/accounts/{account_id}
pub async fn get_account(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(account_id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .account_service
        .get(&account_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Account not found"))?;

    Ok(Json(AccountResponse::from_account(&account)))
}

/// POST /admin/accounts/{account_id}/toggle
///
/// Flips the account between active and inactive. Deactivation instantly
/// refuses every key the account owns.
pub async fn toggle_account_status(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    RequireAdmin(auth): RequireAdmin,
    Path(account_id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    debug!(admin = %auth.identifier(), target = %account_id, "Admin toggling account status");

    let account = state
        .account_service
        .toggle_status(auth.actor_id(), &account_id, &client_addr(&headers))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(AccountResponse::from_account(&account)))
}

/// POST /admin/accounts/{account_id}/reset-password
pub async fn reset_account_password(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    RequireAdmin(auth): RequireAdmin,
    Path(account_id): Path<String>,
) -> Result<Json<PasswordResetResponse>, ApiError> {
    debug!(admin = %auth.identifier(), target = %account_id, "Admin resetting password");

    let temp_password = state
        .account_service
        .reset_password(auth.actor_id(), &account_id, &client_addr(&headers))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(PasswordResetResponse {
        account_id,
        temp_password,
    }))
}
