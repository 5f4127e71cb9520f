//! Admin user repository for database operations.
//!
//! Queries are checked at runtime so the crate builds without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use rosa_studio_core::ports::StoreError;
use rosa_studio_core::{AdminUserId, Email};

use super::AdminUserStore;
use crate::models::{AdminUser, AdminUserRecord};

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Internal row type for `PostgreSQL` admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: String,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUserRecord {
    type Error = StoreError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            user: AdminUser {
                id: AdminUserId::new(row.id),
                email,
                name: row.name,
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        })
    }
}

/// [`AdminUserStore`] over `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserStore for AdminUserRepository {
    async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUserRecord>, StoreError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, email, name, password_hash, created_at
            FROM admin_user
            WHERE lower(email) = lower($1)
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, StoreError> {
        let result = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            r"
            INSERT INTO admin_user (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((id, created_at)) => Ok(AdminUser {
                id: AdminUserId::new(id),
                email: email.clone(),
                name: name.to_owned(),
                created_at,
            }),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::Conflict(format!("admin {email} already exists")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
