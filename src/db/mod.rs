pub mod audit;

use async_trait::async_trait;

use crate::models::NewAuditRecord;

pub use audit::PgAuditStore;

/// Storage seam for audit records.
///
/// An implementation runs the insert inside its own scoped session: the row
/// is committed only when the call returns `Ok`, and nothing is left behind
/// when it returns `Err`.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Insert one record and return the store-generated `message_id`.
    async fn insert(&self, record: &NewAuditRecord) -> Result<i64, sqlx::Error>;
}
