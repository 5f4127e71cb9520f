//! Custom-order request form.

use axum::{Json, extract::State, http::StatusCode};
use tracing::{info, instrument};

use rosa_studio_core::{CustomRequest, CustomRequestForm};

use crate::error::Result;
use crate::state::AppState;

/// `POST /api/custom-requests`
///
/// The requested category must be one of the current catalog categories.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<CustomRequestForm>,
) -> Result<(StatusCode, Json<CustomRequest>)> {
    let request = form.validate(&state.catalog().categories())?;
    let stored = state.inbox().submit(request).await?;
    info!(request_id = %stored.id, category = %stored.category, "Custom request received");
    Ok((StatusCode::CREATED, Json(stored)))
}
