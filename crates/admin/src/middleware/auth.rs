//! Authentication extractors and session helpers for admin.
//!
//! Every admin route except login, the session probe and its event stream
//! takes a [`RequireAdmin`]. Failures answer 401 and never touch the
//! public storefront.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires admin authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> String {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthorized)?;

        let admin = current_admin(session).await.ok_or(AppError::Unauthorized)?;

        tracing::Span::current().record("admin_id", tracing::field::display(&admin.id));
        set_sentry_user(&admin.id, Some(admin.email.as_str()));

        Ok(Self(admin))
    }
}

/// The signed-in admin, if any. Unreadable session data counts as signed out.
pub async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

/// The browser's gate token, created on first use.
///
/// Survives login and logout so the event stream opened before a sign-in
/// still hears about it.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn gate_token(session: &Session) -> Result<Uuid, tower_sessions::session::Error> {
    if let Some(gate) = session.get::<Uuid>(session_keys::GATE).await? {
        return Ok(gate);
    }
    let gate = Uuid::new_v4();
    session.insert(session_keys::GATE, gate).await?;
    Ok(gate)
}
