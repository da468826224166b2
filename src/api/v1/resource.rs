//! Key-gated downstream resource endpoint
//!
//! Stands in for whatever service the keys actually protect; the gating
//! extractor does all the work.

use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireApiKey;
use crate::api::types::Json;

/// Response of the protected resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub message: String,
    pub user_id: String,
}

/// GET /v1/resource
pub async fn get_resource(RequireApiKey(grant): RequireApiKey) -> Json<ResourceResponse> {
    Json(ResourceResponse {
        message: "Access Granted".to_string(),
        user_id: grant.account_id.as_str().to_string(),
    })
}
