//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check
//!
//! # Guest
//! GET    /api/guest              - Current guest identity
//!
//! # Catalog
//! GET    /api/items?category=    - Gallery listing
//! GET    /api/items/{id}         - Item detail
//! GET    /api/categories         - Category names
//! GET    /api/profile            - Artist profile
//!
//! # Cart
//! GET    /api/cart               - Current cart
//! POST   /api/cart/items         - Add item {itemId}
//! DELETE /api/cart/items/{id}    - Remove first matching item
//! DELETE /api/cart               - Empty the cart
//! POST   /api/checkout           - Record a purchase (rate limited)
//!
//! # Other
//! POST   /api/traffic            - Page-view beacon (always 204)
//! POST   /api/custom-requests    - Custom-order enquiry
//! POST   /api/workshop/concepts  - AI craft concept (rate limited)
//! ```

pub mod cart;
pub mod catalog;
pub mod custom_requests;
pub mod guest;
pub mod health;
pub mod traffic;
pub mod workshop;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{
    checkout_rate_limiter, guest_cookie_middleware, request_id_middleware, workshop_rate_limiter,
};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(catalog::items))
        .route("/items/{id}", get(catalog::item))
        .route("/categories", get(catalog::categories))
        .route("/profile", get(catalog::profile))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/guest", get(guest::show))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            post(cart::checkout).layer(checkout_rate_limiter()),
        )
        .route("/traffic", post(traffic::record))
        .route("/custom-requests", post(custom_requests::submit))
        .route(
            "/workshop/concepts",
            post(workshop::generate).layer(workshop_rate_limiter()),
        )
}

/// Build the complete application router.
///
/// Sentry layers are added by the binary; everything else is here so tests
/// exercise the same stack.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(session_layer)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            guest_cookie_middleware,
        ))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    guest_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
