use crate::{ListQuery, NotificationKind, Row, RowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// First fetch still in flight; nothing to show yet.
    Loading,
    #[default]
    Empty,
    Populated,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewModel {
    pub search_input: String,
    pub query: ListQuery,
    /// Query string currently written to the location (no `?`).
    pub location: String,
    pub display: DisplayState,
    /// A fetch is in flight while an older page is still shown.
    pub refreshing: bool,
    pub rows: Vec<RowView>,
    pub total_count: u64,
    pub total_pages: Option<u32>,
    /// Rows with an edit or delete in flight.
    pub pending_rows: Vec<RowId>,
    pub notifications: Vec<NotificationView>,
    pub session_expired: bool,
    pub dirty: bool,
}

/// Display columns of a job application row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: RowId,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub applied_on: Option<String>,
    pub status: Option<String>,
    pub source: Option<String>,
}

impl RowView {
    pub(crate) fn from_row(row: &Row) -> Self {
        Self {
            id: row.id().clone(),
            job_title: row.text("jobTitle"),
            company: row.text("company"),
            location: row.text("location"),
            applied_on: row.text("applicationDate"),
            status: row.text("status"),
            source: row.text("source"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}
