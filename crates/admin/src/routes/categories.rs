//! Category management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use rosa_studio_core::catalog::CategoryRemoval;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesView {
    /// Whether the request changed anything.
    pub added: bool,
    pub categories: Vec<String>,
}

/// `GET /api/categories`
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<Vec<String>> {
    Json(state.catalog().categories())
}

/// `POST /api/categories`
///
/// Adding a name that already exists answers 200 with `added: false`.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<NewCategory>,
) -> Result<(StatusCode, Json<CategoriesView>)> {
    let added = state.catalog().add_category(&request.name).await?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(CategoriesView {
            added,
            categories: state.catalog().categories(),
        }),
    ))
}

/// `DELETE /api/categories/{name}`
///
/// Items keep the deleted name; the response counts them.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(name): Path<String>,
) -> Result<Json<CategoryRemoval>> {
    Ok(Json(state.catalog().delete_category(&name).await?))
}
