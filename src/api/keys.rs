//! Self-service API key management for the authenticated principal

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::{client_addr, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::ApiKey;

const DEFAULT_PAGE_SIZE: usize = 50;
const MAX_PAGE_SIZE: usize = 200;

/// Request to create a new API key
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKeyRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// Days until expiry; defaults to 30
    #[validate(range(min = 1, message = "expires_in_days must be a positive integer"))]
    pub expires_in_days: Option<u32>,
}

/// Pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PageQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// API key representation in responses; never includes hash or secret
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub key_prefix: String,
    pub status: String,
    pub expires_at: Option<String>,
    pub last_used_at: Option<String>,
    pub total_hits: u64,
    pub created_at: String,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().as_str().to_string(),
            account_id: key.account_id().as_str().to_string(),
            name: key.name().to_string(),
            key_prefix: key.key_prefix().to_string(),
            status: key.status().as_str().to_string(),
            expires_at: key.expires_at().map(|dt| dt.to_rfc3339()),
            last_used_at: key.last_used_at().map(|dt| dt.to_rfc3339()),
            total_hits: key.total_hits(),
            created_at: key.created_at().to_rfc3339(),
        }
    }
}

/// Response carrying the freshly issued key and its secret
///
/// The secret appears here and nowhere else, ever again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedKeyResponse {
    #[serde(flatten)]
    pub api_key: ApiKeyResponse,
    pub secret: String,
}

/// List response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// POST /keys
pub async fn create_key(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    RequireUser(account): RequireUser,
    Json(request): Json<CreateKeyRequest>,
) -> Result<(StatusCode, Json<IssuedKeyResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let (api_key, secret) = state
        .api_key_service
        .issue(
            account.id(),
            &request.name,
            request.expires_in_days,
            &client_addr(&headers),
        )
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(IssuedKeyResponse {
            api_key: ApiKeyResponse::from(&api_key),
            secret,
        }),
    ))
}

/// GET /keys
pub async fn list_keys(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListKeysResponse>, ApiError> {
    let limit = page.limit();
    let offset = page.offset();

    let keys = state
        .api_key_service
        .list_owned(account.id(), limit, offset)
        .await
        .map_err(ApiError::from)?;

    let total = state
        .api_key_service
        .count_owned(account.id())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListKeysResponse {
        api_keys: keys.iter().map(ApiKeyResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// GET /keys/{key_id}
pub async fn get_key(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let key = state
        .api_key_service
        .get_owned(account.id(), &key_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found("Key not found"))?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// POST /keys/{key_id}/revoke
pub async fn revoke_key(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    RequireUser(account): RequireUser,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let key = state
        .api_key_service
        .revoke_owned(account.id(), &key_id, &client_addr(&headers))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiKeyResponse::from(&key)))
}
