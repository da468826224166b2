//! Audit infrastructure - recorder and repository implementations

mod postgres_repository;
mod recorder;
mod repository;

pub use postgres_repository::PostgresAuditRepository;
pub use recorder::AuditRecorder;
pub use repository::InMemoryAuditRepository;
