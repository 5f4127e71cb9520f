//! Public catalog reads.
//!
//! Served from the in-process catalog copy; no request touches the
//! database directly.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use rosa_studio_core::{ArtistProfile, ItemId, PortfolioItem};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    /// Category name; absent, empty or `All` lists everything.
    pub category: Option<String>,
}

/// `GET /api/items?category=`
pub async fn items(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Json<Vec<PortfolioItem>> {
    Json(state.catalog().items_in(query.category.as_deref()))
}

/// `GET /api/items/{id}`
pub async fn item(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<PortfolioItem>> {
    state
        .catalog()
        .item(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

/// `GET /api/categories`
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog().categories())
}

/// `GET /api/profile`
pub async fn profile(State(state): State<AppState>) -> Json<ArtistProfile> {
    Json(state.catalog().profile())
}
