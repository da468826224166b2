//! API key authentication middleware

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{AuthFailure, KeyGrant, Verdict};

/// Header carrying the raw key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that requires a valid API key in the `X-API-KEY` header
///
/// Denials map to 401, except an inactive owning account which maps to 403.
/// A storage failure maps to 500 - it is never presented as a denial.
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub KeyGrant);

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw_key = match extract_api_key(&parts.headers) {
            Some(key) => key,
            None => return Err(failure_to_error(AuthFailure::MissingKey)),
        };

        debug!(
            key_prefix = %raw_key.chars().take(10).collect::<String>(),
            "Validating API key"
        );

        let verdict = state
            .api_key_service
            .validate(&raw_key)
            .await
            .map_err(ApiError::from)?;

        match verdict {
            Verdict::Valid(grant) => Ok(RequireApiKey(grant)),
            Verdict::Denied(failure) => Err(failure_to_error(failure)),
        }
    }
}

/// Extract the raw key from the `X-API-KEY` header
pub fn extract_api_key(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Map a denial to its HTTP status
pub fn failure_to_error(failure: AuthFailure) -> ApiError {
    match failure {
        AuthFailure::AccountInactive => ApiError::forbidden(failure.as_str()),
        _ => ApiError::unauthorized(failure.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};

    #[test]
    fn test_extract_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "sk_test123".parse().unwrap());

        assert_eq!(extract_api_key(&headers), Some("sk_test123".to_string()));
    }

    #[test]
    fn test_extract_api_key_trims_whitespace() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "  sk_test123  ".parse().unwrap());

        assert_eq!(extract_api_key(&headers), Some("sk_test123".to_string()));
    }

    #[test]
    fn test_extract_api_key_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_api_key(&headers), None);
    }

    #[test]
    fn test_extract_api_key_empty_value() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "   ".parse().unwrap());

        assert_eq!(extract_api_key(&headers), None);
    }

    #[test]
    fn test_failure_status_mapping() {
        assert_eq!(
            failure_to_error(AuthFailure::MissingKey).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            failure_to_error(AuthFailure::InvalidKey).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            failure_to_error(AuthFailure::Expired).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            failure_to_error(AuthFailure::Revoked).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            failure_to_error(AuthFailure::AccountInactive).status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_failure_messages_are_wire_strings() {
        assert_eq!(
            failure_to_error(AuthFailure::MissingKey).message,
            "Missing API Key"
        );
        assert_eq!(
            failure_to_error(AuthFailure::AccountInactive).message,
            "User Inactive - API Access Denied"
        );
    }
}
