//! Page views in `site_traffic`.

use async_trait::async_trait;
use sqlx::PgPool;

use super::count_to_u64;
use crate::ports::{StoreError, TrafficLog};
use crate::types::TrafficEvent;

/// [`TrafficLog`] over `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgTrafficLog {
    pool: PgPool,
}

impl PgTrafficLog {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrafficLog for PgTrafficLog {
    async fn record(&self, event: &TrafficEvent) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO site_traffic (page_path, guest_id, created_at) VALUES ($1, $2, $3)")
            .bind(&event.page_path)
            .bind(event.guest_id)
            .bind(event.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM site_traffic")
            .fetch_one(&self.pool)
            .await?;
        Ok(count_to_u64(count))
    }
}
