//! What the admin session remembers about the signed-in operator.

use serde::{Deserialize, Serialize};

use rosa_studio_core::{AdminUserId, Email};

use super::admin_user::AdminUser;

/// The signed-in operator, as stored in the session and returned by
/// `POST /api/auth/login` and `GET /api/session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: Email,
    /// Shown in the dashboard header.
    pub name: String,
}

impl From<AdminUser> for CurrentAdmin {
    fn from(AdminUser { id, email, name, .. }: AdminUser) -> Self {
        Self { id, email, name }
    }
}

pub mod keys {
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Per-browser token that routes session change events.
    pub const GATE: &str = "gate";
}
