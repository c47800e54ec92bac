use std::sync::Arc;

use serde_json::{Map, Value};

use super::{AuditError, fields, time};
use crate::db::AuditStore;

/// Validates audit events and persists them through an [`AuditStore`].
///
/// Holds nothing but the store handle, so one instance is shared by every
/// request.
#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Create one audit record and return its `message_id`.
    ///
    /// Validation runs to completion before the store is touched, so a
    /// rejected event never produces a row. Every failure is logged here.
    pub async fn create_audit_record(&self, data: &Map<String, Value>) -> Result<i64, AuditError> {
        let mut record = fields::validate(data).inspect_err(|e| {
            tracing::error!("Audit record rejected: {e}");
        })?;

        record.created_at = time::resolve(data.get("time"));

        let message_id = self.store.insert(&record).await.map_err(|e| {
            tracing::error!(
                "Failed to insert audit record (module={}, object={}): {e:?}",
                record.module_name,
                record.object_id
            );
            AuditError::from(e)
        })?;

        tracing::info!(
            "Created audit record: id={message_id}, module={}, object={}",
            record.module_name,
            record.object_id
        );

        Ok(message_id)
    }
}
