//! Guest identity endpoint.

use axum::Json;

use crate::middleware::Guest;
use crate::services::GuestIdentity;

/// `GET /api/guest`
pub async fn show(guest: Guest) -> Json<GuestIdentity> {
    Json(guest.identity)
}
