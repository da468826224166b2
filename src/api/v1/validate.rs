//! Explicit key validation endpoint

use axum::{extract::State, http::HeaderMap};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::middleware::extract_api_key;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::{AuthFailure, Verdict};

/// Response of the explicit validation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ValidateResponse {
    fn denied(failure: AuthFailure) -> Self {
        Self {
            valid: false,
            error: Some(failure.as_str().to_string()),
            user_id: None,
            role: None,
            timestamp: None,
        }
    }
}

/// GET /v1/validate
///
/// Explicit-check contract: authorization failures answer HTTP 200 with
/// `{valid: false, error}`, never 401. Only infrastructure failures produce a
/// non-200.
pub async fn validate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ValidateResponse>, ApiError> {
    let raw_key = match extract_api_key(&headers) {
        Some(key) => key,
        None => return Ok(Json(ValidateResponse::denied(AuthFailure::MissingKey))),
    };

    let verdict = state
        .api_key_service
        .validate(&raw_key)
        .await
        .map_err(ApiError::from)?;

    let response = match verdict {
        Verdict::Valid(grant) => ValidateResponse {
            valid: true,
            error: None,
            user_id: Some(grant.account_id.as_str().to_string()),
            role: Some(grant.role.as_str().to_string()),
            timestamp: Some(Utc::now().to_rfc3339()),
        },
        Verdict::Denied(failure) => ValidateResponse::denied(failure),
    };

    Ok(Json(response))
}
