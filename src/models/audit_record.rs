use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A persisted row of the `audit` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditRecord {
    pub message_id: i64,
    pub module_name: String,
    pub object_id: Uuid,
    pub initiator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// A validated audit event ready for insertion.
///
/// `created_at` is `None` when the caller supplied no usable time; the store
/// then stamps the row with its own clock.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    pub module_name: String,
    pub object_id: Uuid,
    pub initiator_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
    pub message: String,
}
