//! Commission enquiries in `custom_requests`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::ports::{CustomRequestInbox, StoreError};
use crate::types::{CustomRequest, CustomRequestId, Email, NewCustomRequest};

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: String,
    name: String,
    email: String,
    category: String,
    description: String,
    created_at: DateTime<Utc>,
}

/// [`CustomRequestInbox`] over `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCustomRequestInbox {
    pool: PgPool,
}

impl PgCustomRequestInbox {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomRequestInbox for PgCustomRequestInbox {
    async fn submit(&self, request: NewCustomRequest) -> Result<CustomRequest, StoreError> {
        let (id, created_at) = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            r"
            INSERT INTO custom_requests (name, email, category, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            ",
        )
        .bind(&request.name)
        .bind(request.email.as_str())
        .bind(&request.category)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(request.stored(CustomRequestId::new(id), created_at))
    }

    async fn list_requests(&self) -> Result<Vec<CustomRequest>, StoreError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r"
            SELECT id, name, email, category, description, created_at
            FROM custom_requests
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<CustomRequest, StoreError> {
                let email = Email::parse(&row.email).map_err(|e| {
                    StoreError::DataCorruption(format!("invalid email in request {}: {e}", row.id))
                })?;
                Ok(CustomRequest {
                    id: CustomRequestId::new(row.id),
                    name: row.name,
                    email,
                    category: row.category,
                    description: row.description,
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}
