//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; clients get a JSON body with a
//! generic message for those.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use rosa_studio_core::ValidationError;
use rosa_studio_core::catalog::CatalogError;
use rosa_studio_core::ports::StoreError;

use crate::services::cart::CartError;
use crate::services::workshop::GeminiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A remote store call failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Workshop error: {0}")]
    Gemini(#[from] GeminiError),

    /// No Gemini API key configured.
    #[error("Workshop is not available")]
    WorkshopDisabled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::Catalog(CatalogError::Validation(_))
            | Self::Cart(CartError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Gemini(GeminiError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            Self::Catalog(_) | Self::Cart(_) | Self::Store(_) | Self::Gemini(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::WorkshopDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() && !matches!(self, Self::WorkshopDisabled) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Gemini(_) => "Concept generation failed, please try again".to_string(),
            Self::Catalog(CatalogError::Validation(e))
            | Self::Cart(CartError::Validation(e))
            | Self::Validation(e) => e.to_string(),
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => self.to_string(),
            Self::Catalog(_) | Self::Cart(_) | Self::Store(_) => {
                "Storage is unavailable, please try again".to_string()
            }
            Self::WorkshopDisabled => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a visitor action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use rosa_studio_core::ItemId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("item 7".to_string());
        assert_eq!(err.to_string(), "Not found: item 7");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(ValidationError::EmptyCart.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CartError::Validation(ValidationError::MissingField("zip")).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CartError::Ledger(StoreError::Unavailable("down".into())).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(CatalogError::NotFound(ItemId::new("9")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(StoreError::Unavailable("down".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::WorkshopDisabled),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(GeminiError::RateLimited(5).into()),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
