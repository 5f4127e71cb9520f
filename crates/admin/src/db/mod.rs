//! Admin user storage.
//!
//! # Tables
//!
//! - `admin_user` - Admin credentials (argon2 hashes)
//! - `admin.session` - Admin session storage
//!
//! Catalog, cart, purchase and traffic tables are reached through the
//! shared ports in `rosa_studio_core`.

pub mod admin_users;
pub mod memory;

use async_trait::async_trait;

use rosa_studio_core::Email;
use rosa_studio_core::ports::StoreError;

use crate::models::{AdminUser, AdminUserRecord};

pub use admin_users::AdminUserRepository;
pub use memory::MemoryAdminUsers;

/// Storage for admin accounts.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    async fn get_by_email(&self, email: &Email) -> Result<Option<AdminUserRecord>, StoreError>;

    /// Returns [`StoreError::Conflict`] when the email is taken.
    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, StoreError>;
}
