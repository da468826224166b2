//! Admin API endpoints for managing accounts, keys, and the audit log

pub mod accounts;
pub mod api_keys;
pub mod audit;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Account management
        .route("/accounts", get(accounts::list_accounts))
        .route("/accounts/{account_id}", get(accounts::get_account))
        .route(
            "/accounts/{account_id}/toggle",
            post(accounts::toggle_account_status),
        )
        .route(
            "/accounts/{account_id}/reset-password",
            post(accounts::reset_account_password),
        )
        // API key management
        .route("/api-keys", get(api_keys::list_api_keys))
        .route("/api-keys/{key_id}/revoke", post(api_keys::revoke_api_key))
        .route("/api-keys/{key_id}", delete(api_keys::delete_api_key))
        // Audit feed
        .route("/audit", get(audit::recent_audit_entries))
}
