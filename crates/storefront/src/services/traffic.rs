//! Page-view recording.
//!
//! Visits are written to the traffic log once per path change for a guest.
//! The last path seen for each guest is held in a bounded `moka` cache, so a
//! guest that stays idle long enough may be counted again on the same page.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use rosa_studio_core::ports::TrafficLog;
use rosa_studio_core::{GuestId, TrafficEvent, normalize_page_path};

/// What happened to a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitOutcome {
    Recorded,
    /// Same path as the guest's previous visit.
    Duplicate,
    /// The log write failed; logged and dropped.
    Failed,
    /// Empty or oversized path.
    Ignored,
}

/// Fire-and-forget page-view recorder.
#[derive(Clone)]
pub struct TrafficLogger {
    log: Arc<dyn TrafficLog>,
    last_path: Cache<GuestId, String>,
}

impl TrafficLogger {
    #[must_use]
    pub fn new(log: Arc<dyn TrafficLog>) -> Self {
        let last_path = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(Duration::from_secs(30 * 60))
            .build();
        Self { log, last_path }
    }

    /// Record a visit to `path` by `guest`. Never fails.
    #[instrument(skip(self), fields(guest_id = %guest))]
    pub async fn log_visit(&self, path: &str, guest: GuestId) -> VisitOutcome {
        let Some(path) = normalize_page_path(path) else {
            debug!("Ignoring empty or oversized page path");
            return VisitOutcome::Ignored;
        };

        if self.last_path.get(&guest).await.as_deref() == Some(path.as_str()) {
            return VisitOutcome::Duplicate;
        }
        self.last_path.insert(guest, path.clone()).await;

        match self.log.record(&TrafficEvent::now(path, guest)).await {
            Ok(()) => VisitOutcome::Recorded,
            Err(e) => {
                warn!(error = %e, "Failed to record page view");
                // Let the next visit to this path try again.
                self.last_path.invalidate(&guest).await;
                VisitOutcome::Failed
            }
        }
    }
}
