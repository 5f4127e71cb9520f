//! Long-lived cookie that carries the visitor's guest id.
//!
//! The guest id outlives the cart session: the session cookie lapses after
//! a week of inactivity, while this one is re-issued with a fresh
//! `Max-Age` whenever it changes and is otherwise left alone. Browsers cap
//! cookie lifetimes at roughly 400 days, which is the longest we can ask
//! for.

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use crate::state::AppState;

pub const GUEST_COOKIE_NAME: &str = "rosa_guest";

const GUEST_COOKIE_MAX_AGE: Duration = Duration::days(400);

#[derive(Debug, Default)]
struct Slot {
    value: Option<String>,
    changed: bool,
}

/// The guest cookie for one request. Handlers read and replace the value;
/// the middleware writes it back when it changed.
#[derive(Debug, Clone, Default)]
pub struct GuestCookie(Arc<Mutex<Slot>>);

impl GuestCookie {
    fn with_value(value: Option<String>) -> Self {
        Self(Arc::new(Mutex::new(Slot {
            value,
            changed: false,
        })))
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    pub fn set(&self, value: String) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        slot.value = Some(value);
        slot.changed = true;
    }

    fn take_change(&self) -> Option<String> {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.changed {
            slot.changed = false;
            slot.value.clone()
        } else {
            None
        }
    }
}

fn read_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == GUEST_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Expose the guest cookie to handlers and persist any new value.
pub async fn guest_cookie_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie = GuestCookie::with_value(read_cookie(&request));
    request.extensions_mut().insert(cookie.clone());

    let mut response = next.run(request).await;

    if let Some(value) = cookie.take_change() {
        let set_cookie = Cookie::build((GUEST_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(state.config().is_secure())
            .max_age(GUEST_COOKIE_MAX_AGE)
            .build();
        match HeaderValue::from_str(&set_cookie.to_string()) {
            Ok(header_value) => {
                response.headers_mut().append(header::SET_COOKIE, header_value);
            }
            Err(e) => tracing::warn!(error = %e, "Guest cookie is not a valid header"),
        }
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_cookie_is_not_rewritten() {
        let cookie = GuestCookie::with_value(Some("abc".to_string()));
        assert_eq!(cookie.get().as_deref(), Some("abc"));
        assert_eq!(cookie.take_change(), None);
    }

    #[test]
    fn test_new_value_is_written_once() {
        let cookie = GuestCookie::default();
        cookie.set("abc".to_string());
        assert_eq!(cookie.take_change().as_deref(), Some("abc"));
        assert_eq!(cookie.take_change(), None);
    }

    #[test]
    fn test_reads_named_cookie_among_others() {
        let request = Request::builder()
            .header(header::COOKIE, "rosa_session=xyz; rosa_guest=g-1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(read_cookie(&request).as_deref(), Some("g-1"));
    }
}
