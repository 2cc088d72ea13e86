use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use crate::view_model::{DisplayState, ListViewModel, NotificationView, RowView};
use crate::{ListQuery, ResultPage, Row, RowId, RowPatch};

/// Default quiet period before typed search text is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Notifications kept at once; the oldest is dropped first.
pub const MAX_NOTIFICATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    FetchFailed,
    EditFailed,
    DeleteFailed,
    SessionExpired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Terminal outcome of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Superseded,
    Failed,
}

/// State of the list view: the committed query, the uncommitted search
/// input, the last applied page and the bookkeeping for timers and requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    query: ListQuery,
    search_input: String,
    debounce: Duration,
    commit_token: u64,
    commit_pending: bool,
    generation: u64,
    in_flight: Option<u64>,
    last_outcome: Option<FetchOutcome>,
    page: Option<ResultPage>,
    location: String,
    pending_rows: BTreeSet<RowId>,
    notifications: VecDeque<Notification>,
    next_notification_id: u64,
    session_expired: bool,
    dirty: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(ListQuery::default())
    }
}

impl ListState {
    pub fn new(query: ListQuery) -> Self {
        Self {
            search_input: query.search_text.clone(),
            location: query.to_query_string(),
            query,
            debounce: DEFAULT_DEBOUNCE,
            commit_token: 0,
            commit_pending: false,
            generation: 0,
            in_flight: None,
            last_outcome: None,
            page: None,
            pending_rows: BTreeSet::new(),
            notifications: VecDeque::new(),
            next_notification_id: 1,
            session_expired: false,
            dirty: false,
        }
    }

    /// Builds the state from the location's query string.
    pub fn from_query_string(raw: &str) -> Self {
        Self::new(ListQuery::from_query_string(raw))
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn page(&self) -> Option<&ResultPage> {
        self.page.as_ref()
    }

    /// Query string last written to the location (no `?`).
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn last_outcome(&self) -> Option<FetchOutcome> {
        self.last_outcome
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    pub fn total_pages(&self) -> Option<u32> {
        let page = self.page.as_ref()?;
        let size = u64::from(self.query.page_size.max(1));
        let pages = page.total_count().div_ceil(size).max(1);
        Some(u32::try_from(pages).unwrap_or(u32::MAX))
    }

    pub fn view(&self) -> ListViewModel {
        let display = match &self.page {
            None if self.in_flight.is_some() => DisplayState::Loading,
            None => DisplayState::Empty,
            Some(page) if page.is_empty() => DisplayState::Empty,
            Some(_) => DisplayState::Populated,
        };
        let rows = self
            .page
            .as_ref()
            .map(|page| page.rows().iter().map(RowView::from_row).collect())
            .unwrap_or_default();

        ListViewModel {
            search_input: self.search_input.clone(),
            query: self.query.clone(),
            location: self.location.clone(),
            display,
            refreshing: self.page.is_some() && self.in_flight.is_some(),
            rows,
            total_count: self.page.as_ref().map_or(0, ResultPage::total_count),
            total_pages: self.total_pages(),
            pending_rows: self.pending_rows.iter().cloned().collect(),
            notifications: self
                .notifications
                .iter()
                .map(|note| NotificationView {
                    id: note.id,
                    kind: note.kind,
                    message: note.message.clone(),
                })
                .collect(),
            session_expired: self.session_expired,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn query_mut(&mut self) -> &mut ListQuery {
        &mut self.query
    }

    pub(crate) fn replace_query(&mut self, query: ListQuery) {
        self.query = query;
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        self.search_input = text;
        self.dirty = true;
    }

    /// Starts a new quiet period and returns its token.
    pub(crate) fn schedule_commit(&mut self) -> (u64, Duration) {
        self.commit_token += 1;
        self.commit_pending = true;
        (self.commit_token, self.debounce)
    }

    /// Invalidates any pending quiet period. Returns whether one was pending.
    pub(crate) fn cancel_commit(&mut self) -> bool {
        self.commit_token += 1;
        std::mem::take(&mut self.commit_pending)
    }

    /// Accepts a fired timer only when it carries the live token.
    pub(crate) fn take_commit(&mut self, token: u64) -> bool {
        if self.commit_pending && token == self.commit_token {
            self.commit_pending = false;
            true
        } else {
            false
        }
    }

    /// Registers a new fetch for the current query; older fetches become stale.
    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.dirty = true;
        self.generation
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.in_flight == Some(generation)
    }

    pub(crate) fn finish_fetch(&mut self, outcome: FetchOutcome) {
        self.in_flight = None;
        self.last_outcome = Some(outcome);
        self.dirty = true;
    }

    pub(crate) fn apply_page(&mut self, page: ResultPage) -> String {
        self.page = Some(page);
        self.session_expired = false;
        self.location = self.query.to_query_string();
        self.location.clone()
    }

    pub(crate) fn begin_mutation(&mut self, id: &RowId) -> bool {
        let inserted = self.pending_rows.insert(id.clone());
        if inserted {
            self.dirty = true;
        }
        inserted
    }

    pub(crate) fn end_mutation(&mut self, id: &RowId) {
        self.pending_rows.remove(id);
        self.dirty = true;
    }

    pub(crate) fn patch_row(&mut self, id: &RowId, patch: &RowPatch, server: Option<&Row>) -> bool {
        self.page
            .as_mut()
            .is_some_and(|page| page.apply_edit(id, patch, server))
    }

    pub(crate) fn remove_row(&mut self, id: &RowId) -> bool {
        self.page.as_mut().is_some_and(|page| page.apply_delete(id))
    }

    pub(crate) fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            id,
            kind,
            message: message.into(),
        });
        self.dirty = true;
    }

    /// Marks the session expired; the notice is raised again whenever the
    /// previous one is no longer listed.
    pub(crate) fn expire_session(&mut self) {
        self.session_expired = true;
        let listed = self
            .notifications
            .iter()
            .any(|note| note.kind == NotificationKind::SessionExpired);
        if !listed {
            self.notify(
                NotificationKind::SessionExpired,
                "Your session has expired. Please sign in again.",
            );
        }
    }

    pub(crate) fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|note| note.id != id);
        let removed = self.notifications.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }
}
