//! Dashboard figures and recent records.

use axum::{Json, extract::State};
use tracing::instrument;

use rosa_studio_core::{CustomRequest, Purchase};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::DashboardStats;
use crate::state::AppState;

/// `GET /api/dashboard`
///
/// Computed fresh on each call; clients poll every `refreshIntervalSecs`.
#[instrument(skip_all)]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<DashboardStats>> {
    Ok(Json(state.dashboard().snapshot().await?))
}

/// `GET /api/purchases`
pub async fn purchases(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Purchase>>> {
    Ok(Json(state.ledger().list_purchases().await?))
}

/// `GET /api/custom-requests`
pub async fn custom_requests(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<CustomRequest>>> {
    Ok(Json(state.inbox().list_requests().await?))
}
