//! `PostgreSQL` adapters for the storage ports.
//!
//! # Tables
//!
//! - `portfolio_items`, `categories`, `artist_profile` - catalog content
//! - `active_carts` - one mirrored cart per guest
//! - `purchases` - checkout ledger
//! - `site_traffic` - page views
//! - `custom_requests` - commission enquiries
//! - `admin_user` - admin credentials
//! - `tower_sessions.session`, `admin.session` - session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/core/migrations/` and run via:
//! ```bash
//! cargo run -p rosa-studio-cli -- migrate
//! ```
//!
//! Queries are checked at runtime so the crate builds without a database.

mod carts;
mod catalog;
mod custom_requests;
mod purchases;
mod traffic;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use carts::PgCartMirror;
pub use catalog::PgCatalogRepository;
pub use custom_requests::PgCustomRequestInbox;
pub use purchases::PgPurchaseLedger;
pub use traffic::PgTrafficLog;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
