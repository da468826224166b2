//! Audit log admin endpoints

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::audit::AuditEntry;

const DEFAULT_AUDIT_LIMIT: usize = 20;
const MAX_AUDIT_LIMIT: usize = 500;

/// Query parameters for the audit feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

/// Audit entry representation in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntryResponse {
    pub id: String,
    pub action: String,
    pub actor_id: String,
    pub target_id: Option<String>,
    pub details: String,
    pub source_addr: String,
    pub created_at: String,
}

impl From<&AuditEntry> for AuditEntryResponse {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            action: entry.action().as_str().to_string(),
            actor_id: entry.actor_id().as_str().to_string(),
            target_id: entry.target_id().map(String::from),
            details: entry.details().to_string(),
            source_addr: entry.source_addr().to_string(),
            created_at: entry.created_at().to_rfc3339(),
        }
    }
}

/// Audit feed response
#[derive(Debug, Serialize)]
pub struct AuditFeedResponse {
    pub entries: Vec<AuditEntryResponse>,
    pub total: usize,
}

/// GET /admin/audit
///
/// The most recent audit entries, newest first.
pub async fn recent_audit_entries(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditFeedResponse>, ApiError> {
    debug!(admin = %auth.identifier(), "Admin reading audit feed");

    let limit = query
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .min(MAX_AUDIT_LIMIT);

    let entries = state.audit.recent(limit).await.map_err(ApiError::from)?;
    let total = state.audit.count().await.map_err(ApiError::from)?;

    Ok(Json(AuditFeedResponse {
        entries: entries.iter().map(AuditEntryResponse::from).collect(),
        total,
    }))
}
