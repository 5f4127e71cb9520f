//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check
//!
//! # Session (public)
//! POST   /api/auth/login          - Email/password login (rate limited)
//! POST   /api/auth/logout         - Logout
//! GET    /api/session             - Current session state
//! GET    /api/session/events      - Session changes (SSE)
//!
//! # Catalog (admin only)
//! GET    /api/catalog             - Whole catalog and its source
//! POST   /api/catalog/refresh     - Reload from the database
//! POST   /api/catalog/reset       - Restore defaults {confirm: "RESET"}
//! GET    /api/items               - Item listing
//! POST   /api/items               - Create item (multipart)
//! PUT    /api/items/{id}          - Edit item (multipart)
//! DELETE /api/items/{id}          - Delete item
//! GET    /api/categories          - Category names
//! POST   /api/categories          - Add category {name}
//! DELETE /api/categories/{name}   - Delete category
//! GET    /api/profile             - Artist profile
//! PUT    /api/profile             - Edit profile (multipart)
//!
//! # Dashboard (admin only)
//! GET    /api/dashboard           - Active carts, traffic, revenue
//! GET    /api/purchases           - Purchase ledger
//! GET    /api/custom-requests     - Commission enquiries
//! ```

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod forms;
pub mod health;
pub mod items;
pub mod profile;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::{login_rate_limiter, request_id_middleware};
use crate::state::AppState;

/// Largest accepted request body (image uploads).
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Login, logout and session status.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login).layer(login_rate_limiter()))
        .route("/auth/logout", post(auth::logout))
        .route("/session", get(auth::current))
        .route("/session/events", get(auth::events))
}

/// Catalog management.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::show))
        .route("/catalog/refresh", post(catalog::refresh))
        .route("/catalog/reset", post(catalog::reset))
        .route("/items", get(items::list).post(items::create))
        .route("/items/{id}", put(items::update).delete(items::delete))
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/{name}", delete(categories::delete))
        .route("/profile", get(profile::show).put(profile::update))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(session_routes())
        .merge(catalog_routes())
        .route("/dashboard", get(dashboard::stats))
        .route("/purchases", get(dashboard::purchases))
        .route("/custom-requests", get(dashboard::custom_requests))
}

/// Build the complete application router.
///
/// Sentry layers are added by the binary.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(session_layer)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        request_id = tracing::field::Empty,
                        admin_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::AdminConfig;
    use crate::middleware::create_session_layer;
    use crate::state::AdminPorts;

    fn router() -> Router {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://unused".to_string()),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(64)),
            storage: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            tls: None,
        };
        let layer = create_session_layer(MemoryStore::default(), &config);
        app(AppState::new(config, AdminPorts::in_memory(), None), layer)
    }

    async fn status(method: &str, uri: &str) -> StatusCode {
        router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_probes_are_public() {
        assert_eq!(status("GET", "/health").await, StatusCode::OK);
        assert_eq!(status("GET", "/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_need_a_session() {
        for (method, uri) in [
            ("GET", "/api/catalog"),
            ("GET", "/api/items"),
            ("DELETE", "/api/items/1"),
            ("GET", "/api/dashboard"),
            ("GET", "/api/purchases"),
            ("GET", "/api/custom-requests"),
        ] {
            assert_eq!(status(method, uri).await, StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }
}
