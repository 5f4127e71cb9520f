//! Page-view beacon.

use axum::{body::Bytes, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::middleware::Guest;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct VisitRequest {
    path: String,
}

/// `POST /api/traffic`
///
/// Always answers 204, even for malformed bodies or failed writes.
pub async fn record(State(state): State<AppState>, guest: Guest, body: Bytes) -> StatusCode {
    match serde_json::from_slice::<VisitRequest>(&body) {
        Ok(visit) => {
            state.traffic().log_visit(&visit.path, guest.id()).await;
        }
        Err(e) => tracing::debug!(error = %e, "Ignoring malformed traffic beacon"),
    }
    StatusCode::NO_CONTENT
}
