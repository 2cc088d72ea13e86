use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tracker_core::{Effect, Msg, RemoteFailure};
use tracker_engine::{ApiError, ApiSettings, EngineEvent, EngineEvents, EngineHandle};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use super::app::AppMsg;
use super::persistence;

/// Executes core effects: remote calls and timers go to the engine, location
/// rewrites go to the state file.
pub struct EffectRunner {
    engine: EngineHandle,
    state_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(settings: ApiSettings, state_dir: PathBuf, msg_tx: mpsc::Sender<AppMsg>) -> Result<Self> {
        let (engine, events) =
            EngineHandle::with_settings(settings).context("configure job applications API")?;
        spawn_event_loop(events, msg_tx);
        Ok(Self { engine, state_dir })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleSearchCommit { token, delay } => {
                    tracker_debug!("ScheduleSearchCommit token={} delay={:?}", token, delay);
                    self.engine.schedule_search_commit(token, delay);
                }
                Effect::CancelSearchCommit => self.engine.cancel_search_commit(),
                Effect::FetchPage { generation, query } => {
                    tracker_info!(
                        "FetchPage generation={} query={:?}",
                        generation,
                        query.to_query_string()
                    );
                    self.engine.fetch(generation, query);
                }
                Effect::ReplaceLocation { query_string } => {
                    persistence::save_location(&self.state_dir, &query_string);
                }
                Effect::UpdateRow { id, patch } => {
                    tracker_info!("UpdateRow id={} fields={}", id, patch.len());
                    self.engine.update_row(id, patch);
                }
                Effect::DeleteRow { id } => {
                    tracker_info!("DeleteRow id={}", id);
                    self.engine.delete_row(id);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<AppMsg>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(AppMsg::List(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCommitDue { token } => Msg::SearchCommitDue { token },
        EngineEvent::PageFetched { generation, result } => Msg::FetchCompleted {
            generation,
            result: result.map_err(|err| map_failure("fetch", err)),
        },
        EngineEvent::RowUpdated { id, patch, result } => Msg::EditCompleted {
            result: result.map_err(|err| map_failure(&format!("update of row {id}"), err)),
            id,
            patch,
        },
        EngineEvent::RowDeleted { id, result } => Msg::DeleteCompleted {
            result: result.map_err(|err| map_failure(&format!("delete of row {id}"), err)),
            id,
        },
    }
}

fn map_failure(action: &str, err: ApiError) -> RemoteFailure {
    tracker_warn!("Remote {} failed: {}", action, err);
    if err.is_unauthorized() {
        RemoteFailure::unauthorized(err.message)
    } else {
        RemoteFailure::new(err.message)
    }
}

#[cfg(test)]
mod tests {
    use tracker_core::RowId;
    use tracker_engine::FailureKind;

    use super::*;

    fn api_error(kind: FailureKind, message: &str) -> ApiError {
        ApiError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn forbidden_maps_to_unauthorized_failure() {
        let msg = map_event(EngineEvent::RowDeleted {
            id: RowId::from(5),
            result: Err(api_error(FailureKind::Unauthorized(403), "Forbidden")),
        });
        assert_eq!(
            msg,
            Msg::DeleteCompleted {
                id: RowId::from(5),
                result: Err(RemoteFailure::unauthorized("Forbidden")),
            }
        );
    }

    #[test]
    fn other_failures_keep_their_message() {
        let msg = map_event(EngineEvent::PageFetched {
            generation: 9,
            result: Err(api_error(FailureKind::HttpStatus(500), "Server Error")),
        });
        assert_eq!(
            msg,
            Msg::FetchCompleted {
                generation: 9,
                result: Err(RemoteFailure::new("Server Error")),
            }
        );
    }
}
