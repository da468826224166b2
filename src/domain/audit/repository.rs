//! Audit repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::AuditEntry;
use crate::domain::DomainError;

/// Repository trait for the append-only audit log
///
/// Deliberately offers no update or delete operations.
#[async_trait]
pub trait AuditRepository: Send + Sync + Debug {
    /// Append an entry to the log
    async fn append(&self, entry: AuditEntry) -> Result<(), DomainError>;

    /// The most recent entries, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, DomainError>;

    /// Total number of entries
    async fn count(&self) -> Result<usize, DomainError>;
}
