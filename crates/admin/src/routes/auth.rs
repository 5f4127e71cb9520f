//! Login, logout and session status.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_admin, current_admin, gate_token, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::SessionChange;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Current session state.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
    pub admin: Option<CurrentAdmin>,
}

/// `POST /api/auth/login`
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let admin = state.auth().login(&request.email, &request.password).await?;

    // New session id on privilege change
    session.cycle_id().await?;
    set_current_admin(&session, &admin).await?;
    let gate = gate_token(&session).await?;
    state.events().publish(gate, SessionChange::SignedIn);
    set_sentry_user(&admin.id, Some(admin.email.as_str()));

    Ok(Json(admin))
}

/// `POST /api/auth/logout`
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<StatusCode> {
    let was_signed_in = current_admin(&session).await.is_some();
    clear_current_admin(&session).await?;
    clear_sentry_user();

    if was_signed_in {
        let gate = gate_token(&session).await?;
        state.events().publish(gate, SessionChange::SignedOut);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/session`
pub async fn current(session: Session) -> Json<SessionView> {
    let admin = current_admin(&session).await;
    Json(SessionView {
        authenticated: admin.is_some(),
        admin,
    })
}

/// `GET /api/session/events`
///
/// Server-sent events for this browser: the current state first, then
/// `signed_in` / `signed_out` as they happen.
#[instrument(skip(state, session))]
pub async fn events(
    State(state): State<AppState>,
    session: Session,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let gate = gate_token(&session).await?;
    // Subscribe before reading the state so no change falls in between.
    let mut rx = state.events().subscribe();
    let initial = if current_admin(&session).await.is_some() {
        SessionChange::SignedIn
    } else {
        SessionChange::SignedOut
    };

    let stream = async_stream::stream! {
        yield Ok(change_event(initial));
        loop {
            match rx.recv().await {
                Ok(event) if event.gate == gate => yield Ok(change_event(event.change)),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn change_event(change: SessionChange) -> Event {
    Event::default()
        .event(change.as_str())
        .data(json!({ "change": change }).to_string())
}
