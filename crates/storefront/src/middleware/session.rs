//! Cookie session that holds each visitor's cart. The guest id lives in
//! its own cookie (see [`super::guest_cookie`]). Production passes the
//! `PostgreSQL` store; tests pass a memory store.

use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

pub const SESSION_COOKIE_NAME: &str = "rosa_session";

/// A cart left alone this long is forgotten.
const IDLE_LIFETIME: Duration = Duration::days(7);

#[must_use]
pub fn create_session_layer<S>(store: S, config: &StorefrontConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_LIFETIME))
        .with_secure(config.is_secure())
        // Lax so a shared gallery link still lands with the visitor's cart.
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
