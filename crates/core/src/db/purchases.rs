//! Purchase ledger in `purchases`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::ports::{PurchaseLedger, StoreError};
use crate::types::{Email, NewPurchase, Purchase, PurchaseId, PurchaseItems};

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: String,
    customer_email: String,
    total_amount: Decimal,
    items: Json<PurchaseItems>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = StoreError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let customer_email = Email::parse(&row.customer_email).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in purchase {}: {e}", row.id))
        })?;
        Ok(Self {
            id: PurchaseId::new(row.id),
            customer_email,
            total_amount: row.total_amount,
            items: row.items.0,
            created_at: row.created_at,
        })
    }
}

/// [`PurchaseLedger`] over `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgPurchaseLedger {
    pool: PgPool,
}

impl PgPurchaseLedger {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseLedger for PgPurchaseLedger {
    async fn record(&self, purchase: NewPurchase) -> Result<Purchase, StoreError> {
        // The stored amount is what the dashboard later sums; answer with it.
        let (id, total_amount, created_at) =
            sqlx::query_as::<_, (String, Decimal, DateTime<Utc>)>(
                r"
                INSERT INTO purchases (customer_email, total_amount, items)
                VALUES ($1, $2, $3)
                RETURNING id, total_amount, created_at
                ",
            )
            .bind(purchase.customer_email.as_str())
            .bind(purchase.total_amount)
            .bind(Json(&purchase.items))
            .fetch_one(&self.pool)
            .await?;

        let mut recorded = purchase.recorded(PurchaseId::new(id), created_at);
        recorded.total_amount = total_amount;
        Ok(recorded)
    }

    async fn list_purchases(&self) -> Result<Vec<Purchase>, StoreError> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            r"
            SELECT id, customer_email, total_amount, items, created_at
            FROM purchases
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Purchase::try_from).collect()
    }

    async fn total_revenue(&self) -> Result<Decimal, StoreError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT LEAST(COALESCE(SUM(total_amount), 0), $1)::NUMERIC FROM purchases",
        )
        .bind(Decimal::MAX)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    const SCHEMA: &str = include_str!("../../migrations/20260301000000_initial_schema.sql");

    #[test]
    fn test_total_amount_column_keeps_every_digit() {
        let column = SCHEMA
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("total_amount"))
            .unwrap();
        // A fixed scale would round cart totals like 10.555 on insert.
        assert!(column.contains("NUMERIC NOT NULL"), "{column}");
    }
}
