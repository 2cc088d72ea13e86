//! Job tracker engine: remote API client and effect execution.
mod api;
mod decode;
mod engine;
mod persist;
mod timer;
mod types;

pub use api::{ApiSettings, JobsApi, ReqwestJobsApi};
pub use decode::{decode_page, decode_updated_row, error_message};
pub use engine::{EngineEvents, EngineHandle};
pub use persist::{ensure_state_dir, PersistError, StateFile};
pub use timer::SearchDebouncer;
pub use types::{ApiError, EngineEvent, FailureKind};
