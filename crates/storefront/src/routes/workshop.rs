//! Workshop concept generation.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use rosa_studio_core::types::validation::required_bounded;

use crate::error::{AppError, Result};
use crate::services::workshop::Concept;
use crate::state::AppState;

const DEFAULT_STYLE: &str = "Modern Boho";
const MAX_PROMPT_LEN: usize = 1000;
const MAX_STYLE_LEN: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ConceptRequest {
    pub prompt: String,
    #[serde(default)]
    pub style: Option<String>,
}

/// `POST /api/workshop/concepts`
#[instrument(skip(state, request))]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<ConceptRequest>,
) -> Result<Json<Concept>> {
    let client = state.workshop().ok_or(AppError::WorkshopDisabled)?;

    let prompt = required_bounded("prompt", &request.prompt, MAX_PROMPT_LEN)?;
    let style = match request.style.as_deref().map(str::trim) {
        Some(style) if !style.is_empty() => required_bounded("style", style, MAX_STYLE_LEN)?,
        _ => DEFAULT_STYLE.to_string(),
    };

    Ok(Json(client.concept(&prompt, &style).await?))
}
