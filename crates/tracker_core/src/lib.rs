//! Job tracker core: pure list-view state machine and view-model helpers.
mod effect;
mod msg;
mod query;
mod row;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Msg, RemoteFailure};
pub use query::{ListQuery, StatusValue, UnknownStatus, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use row::{ResultPage, Row, RowError, RowId, RowPatch};
pub use state::{
    FetchOutcome, ListState, Notification, NotificationKind, DEFAULT_DEBOUNCE, MAX_NOTIFICATIONS,
};
pub use update::update;
pub use view_model::{DisplayState, ListViewModel, NotificationView, RowView};
