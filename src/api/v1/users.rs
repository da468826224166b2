//! Key-gated account lookup

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::account::Account;

/// Restricted projection of an account - never password or key material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProjection {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub status: String,
    pub role: String,
}

impl From<&Account> for UserProjection {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().as_str().to_string(),
            email: account.email().to_string(),
            name: account.name().map(String::from),
            username: account.username().map(String::from),
            status: account.status().as_str().to_string(),
            role: account.role().as_str().to_string(),
        }
    }
}

/// Lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLookupResponse {
    pub success: bool,
    pub data: UserProjection,
}

/// GET /v1/users/{id}
///
/// Requires a valid key; the caller must be the target account or hold the
/// admin role.
pub async fn get_user(
    State(state): State<AppState>,
    RequireApiKey(grant): RequireApiKey,
    Path(id): Path<String>,
) -> Result<Json<UserLookupResponse>, ApiError> {
    let is_self = grant.account_id.as_str() == id;

    if !grant.role.is_admin() && !is_self {
        return Err(ApiError::forbidden(
            "Unauthorized: Access denied to this user ID",
        ));
    }

    let account = state
        .account_service
        .get(&id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserLookupResponse {
        success: true,
        data: UserProjection::from(&account),
    }))
}
