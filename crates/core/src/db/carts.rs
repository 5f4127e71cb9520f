//! Mirrored guest carts in `active_carts`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use super::count_to_u64;
use crate::ports::{CartMirror, StoreError};
use crate::types::{CartSnapshot, GuestId, PortfolioItem};

#[derive(sqlx::FromRow)]
struct CartRow {
    guest_id: GuestId,
    items: Json<Vec<PortfolioItem>>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for CartSnapshot {
    fn from(row: CartRow) -> Self {
        Self {
            guest_id: row.guest_id,
            items: row.items.0,
            updated_at: row.updated_at,
        }
    }
}

/// [`CartMirror`] over `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCartMirror {
    pool: PgPool,
}

impl PgCartMirror {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartMirror for PgCartMirror {
    async fn upsert_cart(&self, guest: &GuestId, items: &[PortfolioItem]) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO active_carts (guest_id, items, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (guest_id) DO UPDATE
            SET items = EXCLUDED.items, updated_at = now()
            ",
        )
        .bind(guest)
        .bind(Json(items))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_cart(&self, guest: &GuestId) -> Result<Option<CartSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT guest_id, items, updated_at FROM active_carts WHERE guest_id = $1",
        )
        .bind(guest)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(CartSnapshot::from))
    }

    async fn list_carts(&self) -> Result<Vec<CartSnapshot>, StoreError> {
        let rows = sqlx::query_as::<_, CartRow>(
            "SELECT guest_id, items, updated_at FROM active_carts ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CartSnapshot::from).collect())
    }

    async fn count_active_carts(&self) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM active_carts WHERE jsonb_array_length(items) > 0",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count_to_u64(count))
    }
}
