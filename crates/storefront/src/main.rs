//! Rosa Studio Storefront - public gallery, cart and checkout API.
//!
//! This binary serves the public JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework
//! - `PostgreSQL` for the catalog, cart mirrors, purchases and traffic
//! - tower-sessions as browser-local storage for guest id and cart
//! - Gemini API for Workshop concepts (optional)
//!
//! # Background Tasks
//!
//! - Cart mirror worker (writes cart snapshots in submission order)
//! - Catalog refresh (pulls remote catalog every `CATALOG_REFRESH_SECS`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rosa_studio_core::catalog::CatalogStore;
use rosa_studio_core::db::create_pool;
use rosa_studio_core::telemetry::{self, SentrySettings, shutdown_signal};
use rosa_studio_storefront::config::StorefrontConfig;
use rosa_studio_storefront::middleware::create_session_layer;
use rosa_studio_storefront::{AppState, StorefrontPorts, app};
use tower_sessions_sqlx_store::PostgresStore;

const DEFAULT_LOG_FILTER: &str = "rosa_studio_storefront=info,rosa_studio_core=info,tower_http=debug";

/// Keep the catalog in step with edits made through the admin server.
fn spawn_catalog_refresh(catalog: Arc<CatalogStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately; startup already refreshed.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = catalog.refresh().await {
                tracing::warn!(error = %e, "Catalog refresh failed; keeping last known catalog");
            }
        }
    });
}

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = telemetry::init(
        DEFAULT_LOG_FILTER,
        &SentrySettings {
            dsn: config.sentry_dsn.clone(),
            environment: config.sentry_environment.clone(),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            // Guests are anonymous; keep their IPs out of reports.
            send_default_pii: false,
        },
    );

    // Migrations run separately: `rosa-cli migrate`.
    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    let state = AppState::new(config.clone(), StorefrontPorts::postgres(&pool), Some(pool.clone()))
        .expect("Failed to initialize application state");

    if let Err(e) = state.catalog().refresh().await {
        tracing::warn!(error = %e, "Catalog unavailable; serving built-in defaults");
    }
    spawn_catalog_refresh(state.catalog().clone(), config.catalog_refresh);

    let app = app(state, create_session_layer(PostgresStore::new(pool), &config))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "storefront listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
