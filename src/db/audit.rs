use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::AuditStore;
use crate::models::NewAuditRecord;

/// Postgres-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn insert(&self, record: &NewAuditRecord) -> Result<i64, sqlx::Error> {
        // Dropping `tx` without commit rolls the insert back.
        let mut tx = self.pool.begin().await?;

        let message_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO audit (module_name, object_id, initiator_id, created_at, message)
             VALUES ($1, $2, $3, COALESCE($4, NOW()), $5)
             RETURNING message_id",
        )
        .bind(&record.module_name)
        .bind(record.object_id)
        .bind(record.initiator_id)
        .bind(record.created_at)
        .bind(&record.message)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(message_id)
    }
}
