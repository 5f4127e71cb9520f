//! Guest identity extractor.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use rosa_studio_core::GuestId;
use rosa_studio_core::ports::LocalStore;

use crate::error::AppError;
use crate::services::guest::{self, GuestIdentity};
use crate::middleware::guest_cookie::GuestCookie;
use crate::services::local_store::BrowserStore;

/// The visitor behind a request, with access to their browser-local storage.
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(guest: Guest) -> Json<GuestIdentity> {
///     Json(guest.identity)
/// }
/// ```
pub struct Guest {
    pub identity: GuestIdentity,
    pub local: Arc<dyn LocalStore>,
}

impl Guest {
    #[must_use]
    pub const fn id(&self) -> GuestId {
        self.identity.id
    }
}

impl<S> FromRequestParts<S> for Guest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        // Set by guest_cookie_middleware
        let cookie = parts
            .extensions
            .get::<GuestCookie>()
            .cloned()
            .ok_or_else(|| {
                AppError::Internal("guest cookie middleware is not installed".to_string())
            })?;

        let local: Arc<dyn LocalStore> = Arc::new(BrowserStore::new(session, cookie));
        let identity = guest::get_or_create(local.as_ref()).await;

        tracing::Span::current().record("guest_id", tracing::field::display(identity.id));

        Ok(Self { identity, local })
    }
}
