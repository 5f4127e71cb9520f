//! Admin user management commands.

use std::sync::Arc;

use rosa_studio_admin::db::AdminUserRepository;
use rosa_studio_admin::services::AdminAuthService;

use super::{CliError, connect};

/// Create a new admin user with an argon2id password hash.
pub async fn create_user(email: &str, name: Option<&str>, password: &str) -> Result<(), CliError> {
    let pool = connect().await?;
    let auth = AdminAuthService::new(Arc::new(AdminUserRepository::new(pool)));

    let user = auth.create_admin(email, name, password).await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Name: {}",
        user.id,
        user.email,
        user.name
    );
    Ok(())
}
