//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use rosa_studio_core::catalog::CatalogError;
use rosa_studio_core::ports::StoreError;
use rosa_studio_core::{AdminUserId, ValidationError};

use crate::services::AdminAuthError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog mutation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A remote store call failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AdminAuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::BadRequest(_)
            | Self::Catalog(CatalogError::Validation(_))
            | Self::Auth(AdminAuthError::InvalidEmail(_) | AdminAuthError::WeakPassword(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized | Self::Auth(AdminAuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) | Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Auth(AdminAuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            Self::Catalog(CatalogError::UploadUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Catalog(_) | Self::Store(_) | Self::Auth(AdminAuthError::Store(_)) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Auth(AdminAuthError::Hash(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) | Self::Auth(AdminAuthError::Hash(_)) => {
                "Internal server error".to_string()
            }
            Self::Catalog(CatalogError::Upload(_)) => {
                "Image upload failed; nothing was saved".to_string()
            }
            Self::Catalog(CatalogError::Store(_))
            | Self::Store(_)
            | Self::Auth(AdminAuthError::Store(_)) => {
                "Storage is unavailable, please try again".to_string()
            }
            Self::Catalog(e) => e.to_string(),
            Self::Auth(e) => e.to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {e}"))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: &AdminUserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
