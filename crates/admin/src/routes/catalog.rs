//! Whole-catalog operations.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use rosa_studio_core::catalog::{CatalogSnapshot, CatalogSource, ResetConfirmation};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub source: CatalogSource,
    #[serde(flatten)]
    pub snapshot: CatalogSnapshot,
}

impl CatalogView {
    fn of(state: &AppState) -> Self {
        Self {
            source: state.catalog().source(),
            snapshot: state.catalog().snapshot(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    /// Must be exactly `RESET`.
    pub confirm: String,
}

/// `GET /api/catalog`
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<CatalogView> {
    Json(CatalogView::of(&state))
}

/// `POST /api/catalog/refresh`
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn refresh(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<CatalogView>> {
    state.catalog().refresh().await?;
    Ok(Json(CatalogView::of(&state)))
}

/// `POST /api/catalog/reset`
///
/// Deletes every item, category and the profile, then restores the
/// built-in defaults.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn reset(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<ResetRequest>,
) -> Result<Json<CatalogView>> {
    let confirmation = ResetConfirmation::from_phrase(&request.confirm).ok_or_else(|| {
        AppError::BadRequest(format!(
            "type {} to confirm the reset",
            ResetConfirmation::PHRASE
        ))
    })?;

    warn!(admin_email = %admin.email, "Catalog reset requested");
    state.catalog().reset_to_defaults(confirmation).await?;
    Ok(Json(CatalogView::of(&state)))
}
