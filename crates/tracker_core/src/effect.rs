use std::time::Duration;

use crate::{ListQuery, RowId, RowPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start (or restart) the search quiet-period timer. When it fires the
    /// runner answers with `Msg::SearchCommitDue { token }`.
    ScheduleSearchCommit { token: u64, delay: Duration },
    /// Drop any pending search timer.
    CancelSearchCommit,
    /// Fetch one page for `query`; the completion must carry `generation`.
    FetchPage { generation: u64, query: ListQuery },
    /// Rewrite the current history entry to this query string (no `?`).
    ReplaceLocation { query_string: String },
    UpdateRow { id: RowId, patch: RowPatch },
    DeleteRow { id: RowId },
}
