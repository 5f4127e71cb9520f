//! Browser-local storage backed by the visitor's cookies.

use async_trait::async_trait;
use tower_sessions::Session;

use rosa_studio_core::ports::{LocalStore, StoreError};

use crate::middleware::guest_cookie::GuestCookie;
use crate::models::session_keys;

/// [`LocalStore`] over a tower-sessions [`Session`].
///
/// Values live in the session record, so they survive for as long as the
/// session cookie does.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

fn unavailable(e: &tower_sessions::session::Error) -> StoreError {
    StoreError::Unavailable(format!("session storage: {e}"))
}

#[async_trait]
impl LocalStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| unavailable(&e))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| unavailable(&e))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.session
            .remove::<String>(key)
            .await
            .map(|_| ())
            .map_err(|e| unavailable(&e))
    }
}

/// The guest id in its own long-lived cookie, everything else in the
/// session.
#[derive(Debug, Clone)]
pub struct BrowserStore {
    session: SessionStore,
    guest: GuestCookie,
}

impl BrowserStore {
    #[must_use]
    pub const fn new(session: Session, guest: GuestCookie) -> Self {
        Self {
            session: SessionStore::new(session),
            guest,
        }
    }
}

#[async_trait]
impl LocalStore for BrowserStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if key == session_keys::GUEST_ID {
            return Ok(self.guest.get());
        }
        self.session.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if key == session_keys::GUEST_ID {
            self.guest.set(value);
            return Ok(());
        }
        self.session.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        if key == session_keys::GUEST_ID {
            return Err(StoreError::Unavailable(
                "the guest id is never removed".to_string(),
            ));
        }
        self.session.remove(key).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn store() -> SessionStore {
        SessionStore::new(session())
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = store();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_guest_id_lives_in_its_cookie_not_the_session() {
        let cookie = GuestCookie::default();
        let store = BrowserStore::new(session(), cookie.clone());
        store
            .set(session_keys::GUEST_ID, "g-1".to_string())
            .await
            .unwrap();
        store.set(session_keys::CART, "[]".to_string()).await.unwrap();

        assert_eq!(cookie.get().as_deref(), Some("g-1"));

        // A lapsed session leaves the cookie behind.
        let fresh = BrowserStore::new(session(), cookie);
        assert_eq!(
            fresh.get(session_keys::GUEST_ID).await.unwrap().as_deref(),
            Some("g-1")
        );
        assert_eq!(fresh.get(session_keys::CART).await.unwrap(), None);
    }
}
