use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracker_core::{ListQuery, RowId, RowPatch};
use tracker_logging::{tracker_debug, tracker_warn};

use crate::api::{ApiSettings, JobsApi, ReqwestJobsApi};
use crate::timer::SearchDebouncer;
use crate::{ApiError, EngineEvent};

enum EngineCommand {
    Fetch { generation: u64, query: ListQuery },
    Update { id: RowId, patch: RowPatch },
    Delete { id: RowId },
    ScheduleSearchCommit { token: u64, delay: Duration },
    CancelSearchCommit,
}

/// Sends work to the engine thread. Dropping the handle stops the thread
/// once queued commands are handed off.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Completions and timer events coming back from the engine thread.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn with_settings(settings: ApiSettings) -> Result<(Self, EngineEvents), ApiError> {
        let api = ReqwestJobsApi::new(settings)?;
        Ok(Self::spawn(Arc::new(api)))
    }

    pub fn spawn(api: Arc<dyn JobsApi>) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut debouncer = SearchDebouncer::new(runtime.handle().clone(), event_tx.clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::ScheduleSearchCommit { token, delay } => {
                        debouncer.schedule(token, delay);
                    }
                    EngineCommand::CancelSearchCommit => debouncer.cancel(),
                    command => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), command, event_tx).await;
                        });
                    }
                }
            }
            tracker_debug!("Engine command channel closed");
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    /// Fetches one page; the completion carries `generation` back unchanged.
    pub fn fetch(&self, generation: u64, query: ListQuery) {
        self.send(EngineCommand::Fetch { generation, query });
    }

    pub fn update_row(&self, id: RowId, patch: RowPatch) {
        self.send(EngineCommand::Update { id, patch });
    }

    pub fn delete_row(&self, id: RowId) {
        self.send(EngineCommand::Delete { id });
    }

    pub fn schedule_search_commit(&self, token: u64, delay: Duration) {
        self.send(EngineCommand::ScheduleSearchCommit { token, delay });
    }

    pub fn cancel_search_commit(&self) {
        self.send(EngineCommand::CancelSearchCommit);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            tracker_warn!("Engine thread is gone; command dropped");
        }
    }
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    api: &dyn JobsApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Fetch { generation, query } => {
            let result = api.list(&query).await;
            EngineEvent::PageFetched { generation, result }
        }
        EngineCommand::Update { id, patch } => {
            let result = api.update(&id, &patch).await;
            EngineEvent::RowUpdated { id, patch, result }
        }
        EngineCommand::Delete { id } => {
            let result = api.delete(&id).await;
            EngineEvent::RowDeleted { id, result }
        }
        EngineCommand::ScheduleSearchCommit { .. } | EngineCommand::CancelSearchCommit => return,
    };
    let _ = event_tx.send(event);
}
