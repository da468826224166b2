//! Admin authentication middleware
//!
//! Allows either:
//! - a bearer token for an account with the admin role
//! - an API key owned by an admin account

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::account::{Account, AccountId};
use crate::domain::api_key::KeyGrant;

use super::auth::RequireApiKey;
use super::user_auth::try_token_auth;

/// The admin principal behind a request
#[derive(Debug, Clone)]
pub enum AdminAuth {
    /// Authenticated via bearer token
    User(Account),
    /// Authenticated via API key
    ApiKey(KeyGrant),
}

impl AdminAuth {
    /// The acting account
    pub fn actor_id(&self) -> &AccountId {
        match self {
            AdminAuth::User(account) => account.id(),
            AdminAuth::ApiKey(grant) => &grant.account_id,
        }
    }

    /// A loggable identifier of the authenticated entity
    pub fn identifier(&self) -> String {
        match self {
            AdminAuth::User(account) => format!("account:{}", account.id()),
            AdminAuth::ApiKey(grant) => format!("api_key:{}", grant.key_id),
        }
    }
}

/// Extractor that requires admin access via token or API key
///
/// Authentication methods, tried in order:
/// 1. Bearer token from `Authorization: Bearer <token>`
/// 2. API key from the `X-API-KEY` header
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminAuth);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(account) = try_token_auth(&parts.headers, state).await {
            if !account.is_admin() {
                return Err(ApiError::forbidden("Admin access required"));
            }

            debug!(account_id = %account.id(), "Admin access via bearer token");
            return Ok(RequireAdmin(AdminAuth::User(account)));
        }

        match RequireApiKey::from_request_parts(parts, state).await {
            Ok(RequireApiKey(grant)) => {
                if !grant.role.is_admin() {
                    return Err(ApiError::forbidden("Admin access required"));
                }

                debug!(key_id = %grant.key_id, "Admin access via API key");
                Ok(RequireAdmin(AdminAuth::ApiKey(grant)))
            }
            Err(_) => Err(ApiError::unauthorized(
                "Admin access required. Provide a bearer token or an admin API key",
            )),
        }
    }
}
