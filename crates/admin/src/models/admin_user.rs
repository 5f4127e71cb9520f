//! Admin user domain types.
//!
//! These types represent validated domain objects for admin authentication.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rosa_studio_core::{AdminUserId, Email};

/// An admin user (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}

/// An admin user together with their stored argon2 hash.
///
/// Never serialized; only the auth service looks at the hash.
#[derive(Clone)]
pub struct AdminUserRecord {
    pub user: AdminUser,
    pub password_hash: String,
}

impl std::fmt::Debug for AdminUserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUserRecord")
            .field("user", &self.user)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
