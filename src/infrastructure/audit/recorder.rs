//! Audit recorder
//!
//! Fire-and-forget front to the audit log. Recording is best-effort by
//! policy: a failed append is logged for the operator and swallowed, so the
//! action that triggered it never fails on its account.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::audit::{AuditAction, AuditEntry, AuditRepository};
use crate::domain::DomainError;

/// Best-effort writer for the append-only audit log
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    repository: Arc<dyn AuditRepository>,
}

impl AuditRecorder {
    /// Create a new recorder over the given repository
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        Self { repository }
    }

    /// Record an action. Never fails the caller.
    pub async fn record(
        &self,
        action: AuditAction,
        actor_id: &AccountId,
        target_id: Option<&str>,
        details: impl Into<String>,
        source_addr: impl Into<String>,
    ) {
        let entry = AuditEntry::new(
            Uuid::new_v4().to_string(),
            action,
            actor_id.clone(),
            target_id.map(String::from),
            details,
            source_addr,
        );

        if let Err(e) = self.repository.append(entry).await {
            warn!(action = %action, actor_id = %actor_id, error = %e,
                  "Failed to record audit entry");
        }
    }

    /// The most recent entries, newest first
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, DomainError> {
        self.repository.recent(limit).await
    }

    /// Total number of recorded entries
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
