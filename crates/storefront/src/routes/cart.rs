//! Cart and checkout route handlers.
//!
//! The cart lives in the visitor's session. Each mutation answers with the
//! updated cart and the outcome of the mirror write, waiting briefly for it
//! so the client can offer a retry when the remote copy fell behind.

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use rosa_studio_core::{Cart, ItemId, PortfolioItem, Purchase, format_amount};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Guest;
use crate::services::cart::{CartChange, CartEngine, CheckoutRequest, SyncOutcome};
use crate::state::AppState;

/// How long a response waits for the mirror write.
const MIRROR_WAIT: Duration = Duration::from_secs(2);

/// Cart as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<PortfolioItem>,
    pub count: usize,
    pub total: Decimal,
    pub total_display: String,
    pub mirror: SyncOutcome,
}

impl CartView {
    fn new(cart: &Cart, mirror: SyncOutcome) -> Self {
        let total = cart.total();
        Self {
            items: cart.items().to_vec(),
            count: cart.count(),
            total,
            total_display: format_amount(total),
            mirror,
        }
    }

    async fn after(engine: &CartEngine, change: CartChange) -> Self {
        let mirror = change.sync.outcome_within(MIRROR_WAIT).await;
        Self::new(engine.cart(), mirror)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub item_id: ItemId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub purchase: Purchase,
    pub cart: CartView,
}

async fn open(state: &AppState, guest: &Guest) -> CartEngine {
    CartEngine::open(guest.id(), guest.local.clone(), state.mirror().clone()).await
}

/// `GET /api/cart`
#[instrument(skip(state, guest), fields(guest_id = %guest.id()))]
pub async fn show(State(state): State<AppState>, guest: Guest) -> Json<CartView> {
    let engine = open(&state, &guest).await;
    Json(CartView::new(engine.cart(), SyncOutcome::Skipped))
}

/// `POST /api/cart/items`
#[instrument(skip(state, guest), fields(guest_id = %guest.id()))]
pub async fn add(
    State(state): State<AppState>,
    guest: Guest,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let item = state
        .catalog()
        .item(&request.item_id)
        .ok_or_else(|| AppError::NotFound(format!("item {}", request.item_id)))?;

    let mut engine = open(&state, &guest).await;
    let change = engine.add(item).await;
    Ok(Json(CartView::after(&engine, change).await))
}

/// `DELETE /api/cart/items/{id}`
#[instrument(skip(state, guest), fields(guest_id = %guest.id()))]
pub async fn remove(
    State(state): State<AppState>,
    guest: Guest,
    Path(item_id): Path<ItemId>,
) -> Json<CartView> {
    let mut engine = open(&state, &guest).await;
    let change = engine.remove(&item_id).await;
    Json(CartView::after(&engine, change).await)
}

/// `DELETE /api/cart`
#[instrument(skip(state, guest), fields(guest_id = %guest.id()))]
pub async fn clear(State(state): State<AppState>, guest: Guest) -> Json<CartView> {
    let mut engine = open(&state, &guest).await;
    let change = engine.clear().await;
    Json(CartView::after(&engine, change).await)
}

/// `POST /api/checkout`
#[instrument(skip(state, guest, request), fields(guest_id = %guest.id()))]
pub async fn checkout(
    State(state): State<AppState>,
    guest: Guest,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutView>)> {
    let mut engine = open(&state, &guest).await;
    let count = engine.cart().count().to_string();
    add_breadcrumb("checkout", "Checkout submitted", &[("items", &count)]);

    let receipt = engine.checkout(state.ledger(), request).await?;
    let mirror = receipt.sync.outcome_within(MIRROR_WAIT).await;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutView {
            purchase: receipt.purchase,
            cart: CartView::new(engine.cart(), mirror),
        }),
    ))
}
