use std::sync::mpsc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracker_logging::tracker_trace;

use crate::EngineEvent;

/// Owns the single pending search timer.
///
/// Scheduling a new timer cancels the previous one, so at most one
/// `SearchCommitDue` is delivered per quiet period.
pub struct SearchDebouncer {
    runtime: Handle,
    event_tx: mpsc::Sender<EngineEvent>,
    pending: Option<CancellationToken>,
}

impl SearchDebouncer {
    pub fn new(runtime: Handle, event_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            runtime,
            event_tx,
            pending: None,
        }
    }

    pub fn schedule(&mut self, token: u64, delay: Duration) {
        self.cancel();
        let cancel = CancellationToken::new();
        self.pending = Some(cancel.clone());

        let event_tx = self.event_tx.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracker_trace!("Search timer token={} cancelled", token);
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(EngineEvent::SearchCommitDue { token });
                }
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
