//! Artist profile editing.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::instrument;

use rosa_studio_core::ArtistProfile;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::forms::CatalogForm;
use crate::state::AppState;

/// `GET /api/profile`
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<ArtistProfile> {
    Json(state.catalog().profile())
}

/// `PUT /api/profile`
///
/// Multipart: `headline`, `highlight`, `description`, and optionally an
/// `image` file or `imageUrl`.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Json<ArtistProfile>> {
    let draft = CatalogForm::read(multipart).await?.into_profile_draft();
    Ok(Json(state.catalog().set_profile(draft).await?))
}
