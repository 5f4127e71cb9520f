//! Rosa Studio Admin - catalog management and dashboard API.
//!
//! This binary serves the admin API on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework
//! - `PostgreSQL` for admin users, sessions and the shared catalog tables
//! - Storage REST API for uploaded images (optional)
//! - Optional HTTPS via rustls

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use rosa_studio_admin::config::{AdminConfig, TlsConfig};
use rosa_studio_admin::middleware::{create_session_layer, postgres_store};
use rosa_studio_admin::storage::StorageClient;
use rosa_studio_admin::{AdminPorts, AppState, app};
use rosa_studio_core::db::create_pool;
use rosa_studio_core::ports::BlobStore;
use rosa_studio_core::telemetry::{self, SentrySettings, shutdown_signal};
use secrecy::ExposeSecret;

const DEFAULT_LOG_FILTER: &str = "rosa_studio_admin=info,rosa_studio_core=info,tower_http=debug";

/// Time in-flight requests get to finish after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    // Must happen before any TLS setup.
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AdminConfig::from_env().expect("Failed to load configuration");

    let _sentry_guard = telemetry::init(
        DEFAULT_LOG_FILTER,
        &SentrySettings {
            dsn: config.sentry_dsn.clone(),
            environment: config.sentry_environment.clone(),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            // Admin errors carry the operator's email.
            send_default_pii: true,
        },
    );

    // Migrations run separately: `rosa-cli migrate`.
    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    let blobs = config.storage.as_ref().map(|storage| -> Arc<dyn BlobStore> {
        Arc::new(StorageClient::new(storage).expect("Failed to build storage client"))
    });

    let state = AppState::new(
        config.clone(),
        AdminPorts::postgres(&pool, blobs),
        Some(pool.clone()),
    );

    if let Err(e) = state.catalog().refresh().await {
        tracing::warn!(error = %e, "Catalog unavailable; showing built-in defaults");
    }

    let app = app(state, create_session_layer(postgres_store(&pool), &config))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    match &config.tls {
        Some(tls) => serve_tls(app, addr, tls).await,
        None => serve_plain(app, addr).await,
    }
}

async fn serve_plain(app: Router, addr: SocketAddr) {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "admin listening (http)");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn serve_tls(app: Router, addr: SocketAddr, tls: &TlsConfig) {
    let rustls_config = RustlsConfig::from_pem(
        tls.cert_pem.as_bytes().to_vec(),
        tls.key_pem.expose_secret().as_bytes().to_vec(),
    )
    .await
    .expect("Failed to load TLS certificates");
    tracing::info!(%addr, "admin listening (https)");

    let handle = Handle::new();
    let drain = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
    });

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("Server error");
}
