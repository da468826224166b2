//! Authentication API endpoints
//!
//! Stateless token exchange only: no cookies, no server-side sessions.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::Account;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_current_account))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: AccountResponse,
    pub expires_at: String,
}

/// Account response (safe to expose)
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl AccountResponse {
    pub(crate) fn from_account(account: &Account) -> Self {
        Self {
            id: account.id().as_str().to_string(),
            email: account.email().to_string(),
            name: account.name().map(String::from),
            username: account.username().map(String::from),
            role: account.role().as_str().to_string(),
            status: account.status().as_str().to_string(),
            created_at: account.created_at().to_rfc3339(),
            last_login_at: account.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Login with email and password
///
/// POST /auth/login
///
/// Returns a bearer token on successful authentication. Unknown email,
/// wrong password, and inactive account are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .account_service
        .authenticate(&request.email, &request.password)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let token = state
        .jwt_service
        .generate(&account)
        .map_err(ApiError::from)?;

    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(Json(LoginResponse {
        token,
        account: AccountResponse::from_account(&account),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Get the current authenticated account
///
/// GET /auth/me
pub async fn get_current_account(
    RequireUser(account): RequireUser,
) -> Result<Json<AccountResponse>, ApiError> {
    Ok(Json(AccountResponse::from_account(&account)))
}
