use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{
    Effect, FetchOutcome, ListQuery, ListState, Msg, NotificationKind, RemoteFailure,
    DEFAULT_PAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ListState, msg: Msg) -> (ListState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => vec![fetch(&mut state)],
        Msg::SearchInputChanged(text) => {
            state.set_search_input(text);
            let (token, delay) = state.schedule_commit();
            vec![Effect::ScheduleSearchCommit { token, delay }]
        }
        Msg::SearchCommitDue { token } => {
            if !state.take_commit(token) {
                tracker_debug!("Ignoring stale search commit token={}", token);
                return (state, Vec::new());
            }
            let committed = state.search_input().trim().to_string();
            if committed == state.query().search_text {
                return (state, Vec::new());
            }
            let query = state.query_mut();
            query.search_text = committed;
            query.page = DEFAULT_PAGE;
            vec![fetch(&mut state)]
        }
        Msg::StatusToggled(status) => {
            let query = state.query_mut();
            query.toggle_status(status);
            query.page = DEFAULT_PAGE;
            vec![fetch(&mut state)]
        }
        Msg::SourceToggled(source) => {
            let source = source.trim();
            if source.is_empty() {
                return (state, Vec::new());
            }
            let query = state.query_mut();
            query.toggle_source(source);
            query.page = DEFAULT_PAGE;
            vec![fetch(&mut state)]
        }
        Msg::PageSelected(page) => select_page(&mut state, page),
        Msg::NextPage => {
            let next = state.query().page.saturating_add(1);
            match state.total_pages() {
                Some(last) if next > last => Vec::new(),
                _ => select_page(&mut state, next),
            }
        }
        Msg::PreviousPage => {
            let previous = state.query().page.saturating_sub(1);
            select_page(&mut state, previous)
        }
        Msg::PageSizeSelected(size) => {
            if size == 0 || size == state.query().page_size {
                return (state, Vec::new());
            }
            let query = state.query_mut();
            query.page_size = size;
            query.page = DEFAULT_PAGE;
            vec![fetch(&mut state)]
        }
        Msg::ClearAll => {
            let mut effects = Vec::with_capacity(2);
            if state.cancel_commit() {
                effects.push(Effect::CancelSearchCommit);
            }
            if !state.search_input().is_empty() {
                state.set_search_input(String::new());
            }
            // The location may still show an older query when the last fetch failed.
            if !state.query().is_default() || !state.location().is_empty() {
                state.replace_query(ListQuery::default());
                effects.push(fetch(&mut state));
            }
            effects
        }
        Msg::RefreshRequested => vec![fetch(&mut state)],
        Msg::FetchCompleted { generation, result } => {
            let outcome = if !state.is_current(generation) {
                FetchOutcome::Superseded
            } else {
                match result {
                    Ok(page) => {
                        tracker_info!(
                            "Applied page generation={} rows={} total={}",
                            generation,
                            page.rows().len(),
                            page.total_count()
                        );
                        let query_string = state.apply_page(page);
                        state.finish_fetch(FetchOutcome::Applied);
                        return (state, vec![Effect::ReplaceLocation { query_string }]);
                    }
                    Err(failure) => {
                        tracker_warn!(
                            "Fetch generation={} failed: {}",
                            generation,
                            failure.message
                        );
                        state.finish_fetch(FetchOutcome::Failed);
                        report(&mut state, NotificationKind::FetchFailed, failure);
                        FetchOutcome::Failed
                    }
                }
            };
            tracker_debug!("Fetch generation={} finished as {:?}", generation, outcome);
            Vec::new()
        }
        Msg::EditRequested { id, patch } => {
            if !state.begin_mutation(&id) {
                tracker_debug!("Edit for row {} ignored; a change is already in flight", id);
                return (state, Vec::new());
            }
            vec![Effect::UpdateRow { id, patch }]
        }
        Msg::EditCompleted { id, patch, result } => {
            state.end_mutation(&id);
            match result {
                Ok(server_row) => {
                    if !state.patch_row(&id, &patch, server_row.as_ref()) {
                        tracker_debug!("Edited row {} is not on the current page", id);
                    }
                }
                Err(failure) => report(&mut state, NotificationKind::EditFailed, failure),
            }
            Vec::new()
        }
        Msg::DeleteRequested { id } => {
            if !state.begin_mutation(&id) {
                tracker_debug!("Delete for row {} ignored; a change is already in flight", id);
                return (state, Vec::new());
            }
            vec![Effect::DeleteRow { id }]
        }
        Msg::DeleteCompleted { id, result } => {
            state.end_mutation(&id);
            match result {
                Ok(()) => {
                    if !state.remove_row(&id) {
                        tracker_debug!("Deleted row {} is not on the current page", id);
                    }
                }
                Err(failure) => report(&mut state, NotificationKind::DeleteFailed, failure),
            }
            Vec::new()
        }
        Msg::NotificationDismissed(id) => {
            state.dismiss(id);
            Vec::new()
        }
    };

    (state, effects)
}

fn fetch(state: &mut ListState) -> Effect {
    let generation = state.begin_fetch();
    Effect::FetchPage {
        generation,
        query: state.query().clone(),
    }
}

fn select_page(state: &mut ListState, page: u32) -> Vec<Effect> {
    if page == 0 || page == state.query().page {
        return Vec::new();
    }
    state.query_mut().page = page;
    vec![fetch(state)]
}

fn report(state: &mut ListState, kind: NotificationKind, failure: RemoteFailure) {
    if failure.unauthorized {
        state.expire_session();
    } else {
        state.notify(kind, failure.message);
    }
}
