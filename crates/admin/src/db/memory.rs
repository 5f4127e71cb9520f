//! In-memory [`AdminUserStore`] for tests and local development.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use rosa_studio_core::ports::StoreError;
use rosa_studio_core::{AdminUserId, Email};

use super::AdminUserStore;
use crate::models::{AdminUser, AdminUserRecord};

#[derive(Debug, Default)]
pub struct MemoryAdminUsers {
    users: Mutex<Vec<AdminUserRecord>>,
}

impl MemoryAdminUsers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminUserStore for MemoryAdminUsers {
    async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUserRecord>, StoreError> {
        let users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(users
            .iter()
            .find(|record| record.user.email.as_str().eq_ignore_ascii_case(email.as_str()))
            .cloned())
    }

    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, StoreError> {
        let mut users = self.users.lock().unwrap_or_else(PoisonError::into_inner);
        if users
            .iter()
            .any(|record| record.user.email.as_str().eq_ignore_ascii_case(email.as_str()))
        {
            return Err(StoreError::Conflict(format!("admin {email} already exists")));
        }

        let user = AdminUser {
            id: AdminUserId::new(Uuid::new_v4().to_string()),
            email: email.clone(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        users.push(AdminUserRecord {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(user)
    }
}
