use crate::{ResultPage, Row, RowId, RowPatch, StatusValue};

/// A remote call that did not succeed, as seen by the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    /// The server rejected our credentials (HTTP 401/403).
    pub unauthorized: bool,
    pub message: String,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            unauthorized: false,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            unauthorized: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The list was shown; issues the first fetch.
    Mounted,
    /// User typed into the search box (uncommitted until the quiet period ends).
    SearchInputChanged(String),
    /// The search quiet-period timer identified by `token` fired.
    SearchCommitDue { token: u64 },
    /// User clicked a status chip.
    StatusToggled(StatusValue),
    /// User clicked a source chip.
    SourceToggled(String),
    PageSelected(u32),
    NextPage,
    PreviousPage,
    PageSizeSelected(u32),
    /// Reset search, filters and pagination in one step.
    ClearAll,
    /// Reissue the current query.
    RefreshRequested,
    /// Remote page for the fetch issued with `generation`.
    FetchCompleted {
        generation: u64,
        result: Result<ResultPage, RemoteFailure>,
    },
    EditRequested { id: RowId, patch: RowPatch },
    /// `Ok(Some(row))` when the server echoed the updated row.
    EditCompleted {
        id: RowId,
        patch: RowPatch,
        result: Result<Option<Row>, RemoteFailure>,
    },
    DeleteRequested { id: RowId },
    DeleteCompleted {
        id: RowId,
        result: Result<(), RemoteFailure>,
    },
    NotificationDismissed(u64),
}
