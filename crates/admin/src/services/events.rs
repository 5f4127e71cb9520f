//! Session change notifications.
//!
//! Login and logout publish an [`AuthEvent`] tagged with the browser's gate
//! token. `GET /api/session/events` subscribes and forwards the events for
//! its own gate, so other tabs of the same browser learn about sign-ins and
//! sign-outs without polling.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Buffered events per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// What happened to a browser's admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionChange {
    SignedIn,
    SignedOut,
}

impl SessionChange {
    /// SSE event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignedIn => "signed_in",
            Self::SignedOut => "signed_out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// Gate token of the browser whose session changed.
    pub gate: Uuid,
    pub change: SessionChange,
}

/// Broadcast hub for [`AuthEvent`]s.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Notify every subscriber. Having none is not an error.
    pub fn publish(&self, gate: Uuid, change: SessionChange) {
        let receivers = self.tx.send(AuthEvent { gate, change }).unwrap_or(0);
        tracing::debug!(%gate, change = change.as_str(), receivers, "Session change published");
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}
