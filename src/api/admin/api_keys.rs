//! API key management admin endpoints

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::keys::ApiKeyResponse;
use crate::api::middleware::{client_addr, RequireAdmin};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::ApiKeyStatus;

/// Status filter for key listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyFilterQuery {
    pub status: Option<ApiKeyStatus>,
}

/// List API keys response
#[derive(Debug, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

/// Deletion response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteKeyResponse {
    pub deleted: bool,
}

/// GET /admin/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(filter): Query<KeyFilterQuery>,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    debug!(admin = %auth.identifier(), "Admin listing API keys");

    let keys = state
        .api_key_service
        .list(filter.status)
        .await
        .map_err(ApiError::from)?;

    let responses: Vec<ApiKeyResponse> = keys.iter().map(ApiKeyResponse::from).collect();
    let total = responses.len();

    Ok(Json(ListApiKeysResponse {
        api_keys: responses,
        total,
    }))
}

/// POST /admin/api-keys/{key_id}/revoke
pub async fn revoke_api_key(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    RequireAdmin(auth): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    debug!(admin = %auth.identifier(), key_id = %key_id, "Admin revoking API key");

    let key = state
        .api_key_service
        .revoke(auth.actor_id(), &key_id, &client_addr(&headers))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// DELETE /admin/api-keys/{key_id}
///
/// Hard deletion; independent of revocation and admin-only.
pub async fn delete_api_key(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    RequireAdmin(auth): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<DeleteKeyResponse>, ApiError> {
    debug!(admin = %auth.identifier(), key_id = %key_id, "Admin deleting API key");

    let deleted = state
        .api_key_service
        .delete(auth.actor_id(), &key_id, &client_addr(&headers))
        .await
        .map_err(ApiError::from)?;

    if !deleted {
        return Err(ApiError::not_found("Key not found"));
    }

    Ok(Json(DeleteKeyResponse { deleted }))
}
