//! Background mirroring of guest carts.
//!
//! Cart changes are applied locally first and then queued here. A single
//! worker drains the queue in submission order, so for any guest the last
//! snapshot submitted is the last one written. Callers that care about the
//! remote write hold on to the returned [`SyncTicket`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use rosa_studio_core::ports::CartMirror;
use rosa_studio_core::{GuestId, PortfolioItem};

/// Snapshots waiting to be written before submitters start to wait.
const QUEUE_CAPACITY: usize = 1024;

struct MirrorJob {
    guest: GuestId,
    items: Vec<PortfolioItem>,
    done: oneshot::Sender<Result<(), String>>,
}

/// Handle for submitting snapshots to the mirror worker.
#[derive(Debug, Clone)]
pub struct MirrorHandle {
    tx: mpsc::Sender<MirrorJob>,
}

/// Owns the receiving end of the queue.
pub struct MirrorWorker {
    rx: mpsc::Receiver<MirrorJob>,
    mirror: Arc<dyn CartMirror>,
}

impl MirrorWorker {
    /// Start the worker on the current runtime.
    ///
    /// The worker stops once every [`MirrorHandle`] has been dropped and the
    /// queue is drained.
    #[must_use]
    pub fn spawn(mirror: Arc<dyn CartMirror>) -> (MirrorHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = Self { rx, mirror };
        let task = tokio::spawn(worker.run());
        (MirrorHandle { tx }, task)
    }

    async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            let result = self
                .mirror
                .upsert_cart(&job.guest, &job.items)
                .await
                .map_err(|e| e.to_string());

            match &result {
                Ok(()) => debug!(guest_id = %job.guest, items = job.items.len(), "Cart mirrored"),
                Err(e) => warn!(guest_id = %job.guest, error = %e, "Cart mirror write failed"),
            }

            // The submitter may have stopped waiting.
            let _ = job.done.send(result);
        }
        debug!("Cart mirror worker stopped");
    }
}

impl MirrorHandle {
    /// Queue the full item list for `guest`.
    pub async fn submit(&self, guest: GuestId, items: Vec<PortfolioItem>) -> SyncTicket {
        let (done, rx) = oneshot::channel();
        let job = MirrorJob { guest, items, done };
        if self.tx.send(job).await.is_err() {
            warn!(guest_id = %guest, "Cart mirror worker is not running");
        }
        // On send failure the sender inside the job is dropped, so the
        // ticket resolves to `Failed`.
        SyncTicket { rx: Some(rx) }
    }
}

/// Result of a mirror write as seen by the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Nothing changed, so nothing was queued.
    Skipped,
    Mirrored,
    Failed { reason: String },
    /// Still queued when the caller stopped waiting.
    Pending,
}

/// Completion handle for one queued snapshot.
#[derive(Debug)]
#[must_use = "drop the ticket explicitly if the mirror outcome is not needed"]
pub struct SyncTicket {
    rx: Option<oneshot::Receiver<Result<(), String>>>,
}

impl SyncTicket {
    /// A ticket for a change that required no remote write.
    pub const fn skipped() -> Self {
        Self { rx: None }
    }

    /// Wait for the write to finish.
    pub async fn outcome(self) -> SyncOutcome {
        let Some(rx) = self.rx else {
            return SyncOutcome::Skipped;
        };
        match rx.await {
            Ok(Ok(())) => SyncOutcome::Mirrored,
            Ok(Err(reason)) => SyncOutcome::Failed { reason },
            Err(_) => SyncOutcome::Failed {
                reason: "cart mirror worker stopped".to_string(),
            },
        }
    }

    /// Wait at most `limit`; the write continues in the background after that.
    pub async fn outcome_within(self, limit: Duration) -> SyncOutcome {
        tokio::time::timeout(limit, self.outcome())
            .await
            .unwrap_or(SyncOutcome::Pending)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rosa_studio_core::defaults::default_items;
    use rosa_studio_core::memory::MemoryCarts;

    use super::*;

    #[tokio::test]
    async fn test_snapshots_are_written_in_submission_order() {
        let carts = Arc::new(MemoryCarts::new());
        let (handle, _task) = MirrorWorker::spawn(carts.clone());
        let guest = GuestId::generate();
        let items = default_items();

        let mut tickets = Vec::new();
        for n in 1..=items.len() {
            tickets.push(handle.submit(guest, items[..n].to_vec()).await);
        }
        for ticket in tickets {
            assert_eq!(ticket.outcome().await, SyncOutcome::Mirrored);
        }

        let history = carts.history(&guest);
        let lengths: Vec<_> = history.iter().map(Vec::len).collect();
        assert_eq!(lengths, (1..=items.len()).collect::<Vec<_>>());
        let stored = carts.load_cart(&guest).await.unwrap().unwrap();
        assert_eq!(stored.items, items);
    }

    #[tokio::test]
    async fn test_failure_is_reported_on_the_ticket() {
        let carts = Arc::new(MemoryCarts::new());
        carts.failure.set(true);
        let (handle, _task) = MirrorWorker::spawn(carts);
        let ticket = handle.submit(GuestId::generate(), Vec::new()).await;
        assert!(matches!(ticket.outcome().await, SyncOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_skipped_ticket() {
        assert_eq!(SyncTicket::skipped().outcome().await, SyncOutcome::Skipped);
    }
}
