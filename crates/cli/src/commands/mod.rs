//! Subcommand implementations.

pub mod admin;
pub mod catalog;
pub mod migrate;

use sqlx::PgPool;
use thiserror::Error;

use rosa_studio_admin::services::AdminAuthError;
use rosa_studio_core::catalog::CatalogError;
use rosa_studio_core::db::create_pool;
use rosa_studio_core::env::{self, ConfigError};

/// Checked in order, then `DATABASE_URL`.
const DATABASE_URL_VARS: [&str; 2] = ["ADMIN_DATABASE_URL", "STOREFRONT_DATABASE_URL"];

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Admin error: {0}")]
    Admin(#[from] AdminAuthError),

    /// A destructive command ran without its confirmation flag.
    #[error("Refusing to {0} without --yes")]
    NotConfirmed(&'static str),
}

/// Connect using the first database URL found in the environment.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = env::database_url(&DATABASE_URL_VARS)?;

    tracing::info!("Connecting to database...");
    Ok(create_pool(&database_url).await?)
}
