//! Process startup shared by the server binaries.
//!
//! Sentry has to be initialized before the tracing subscriber so the
//! Sentry layer sees the client; [`init`] does both in that order.

use std::borrow::Cow;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How errors are reported to Sentry. No DSN means no reporting.
#[derive(Debug, Clone, Default)]
pub struct SentrySettings {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
    /// Attach user emails and IPs to events.
    pub send_default_pii: bool,
}

/// Start Sentry and install the global tracing subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset. Logs are JSON on
/// Fly.io (`FLY_APP_NAME` set) and human-readable elsewhere.
///
/// The returned guard flushes Sentry on drop; keep it for the life of
/// the process.
#[must_use]
pub fn init(default_filter: &str, settings: &SentrySettings) -> Option<sentry::ClientInitGuard> {
    let guard = settings.dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: settings.environment.clone().map(Cow::Owned),
                sample_rate: settings.sample_rate,
                traces_sample_rate: settings.traces_sample_rate,
                attach_stacktrace: true,
                send_default_pii: settings.send_default_pii,
                ..Default::default()
            },
        ))
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let on_fly = std::env::var_os("FLY_APP_NAME").is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(on_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true)))
        .with((!on_fly).then(tracing_subscriber::fmt::layer))
        .with(sentry_tracing::layer().event_filter(sentry_level))
        .init();

    if guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    guard
}

/// Warnings and errors become Sentry events; info and debug ride along
/// as breadcrumbs.
fn sentry_level(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// # Panics
///
/// If the signal handlers cannot be installed.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

