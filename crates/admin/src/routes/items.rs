//! Portfolio item management.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;

use rosa_studio_core::{ItemId, PortfolioItem};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::forms::CatalogForm;
use crate::state::AppState;

/// `GET /api/items`
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<Vec<PortfolioItem>> {
    Json(state.catalog().items())
}

/// `POST /api/items`
///
/// Multipart: `title`, `category`, `description`, `price`, and either an
/// `image` file or an `imageUrl`.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PortfolioItem>)> {
    let draft = CatalogForm::read(multipart).await?.into_item_draft();
    let item = state.catalog().add_item(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/items/{id}`
///
/// Same fields as create; without a new image the current one is kept.
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ItemId>,
    multipart: Multipart,
) -> Result<Json<PortfolioItem>> {
    let draft = CatalogForm::read(multipart).await?.into_item_draft();
    let item = state.catalog().update_item(&id, draft).await?;
    Ok(Json(item))
}

/// `DELETE /api/items/{id}`
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ItemId>,
) -> Result<StatusCode> {
    if state.catalog().delete_item(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("item {id}")))
    }
}
