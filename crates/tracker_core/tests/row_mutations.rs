use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tracker_core::{
    update, Effect, ListState, Msg, NotificationKind, RemoteFailure, ResultPage, Row, RowId,
    RowPatch,
};

fn page_of(ids: &[u64]) -> ResultPage {
    let rows = ids
        .iter()
        .map(|id| {
            Row::from_value(json!({
                "id": id,
                "jobTitle": format!("Job {id}"),
                "company": "DataSystems",
                "status": "applied",
                "source": "Indeed",
            }))
            .unwrap()
        })
        .collect();
    ResultPage::new(rows, ids.len() as u64)
}

fn mounted(ids: &[u64]) -> ListState {
    let (state, _) = update(ListState::default(), Msg::Mounted);
    let generation = state.generation();
    let (mut state, _) = update(
        state,
        Msg::FetchCompleted {
            generation,
            result: Ok(page_of(ids)),
        },
    );
    state.consume_dirty();
    state
}

fn patch(value: Value) -> RowPatch {
    value.as_object().cloned().unwrap()
}

fn ids(state: &ListState) -> Vec<String> {
    state.view().rows.iter().map(|row| row.id.to_string()).collect()
}

#[test]
fn successful_delete_removes_row_without_refetch() {
    let state = mounted(&[1, 2, 3, 4, 5]);
    let id = RowId::from(3);

    let (state, effects) = update(state, Msg::DeleteRequested { id: id.clone() });
    assert_eq!(effects, vec![Effect::DeleteRow { id: id.clone() }]);
    assert_eq!(state.view().pending_rows, vec![id.clone()]);

    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id,
            result: Ok(()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(ids(&state), vec!["1", "2", "4", "5"]);
    assert_eq!(state.view().total_count, 4);
    assert!(state.view().pending_rows.is_empty());
}

#[test]
fn failed_delete_leaves_rows_untouched() {
    let state = mounted(&[1, 2, 3]);
    let (state, _) = update(state, Msg::DeleteRequested { id: RowId::from(2) });
    let (state, effects) = update(
        state,
        Msg::DeleteCompleted {
            id: RowId::from(2),
            result: Err(RemoteFailure::new("Job not found")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(ids(&state), vec!["1", "2", "3"]);
    assert_eq!(state.view().total_count, 3);
    let notes = state.view().notifications;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::DeleteFailed);
}

#[test]
fn second_delete_for_same_row_is_ignored_while_in_flight() {
    let state = mounted(&[1, 2]);
    let (state, first) = update(state, Msg::DeleteRequested { id: RowId::from(1) });
    let (_state, second) = update(state, Msg::DeleteRequested { id: RowId::from(1) });
    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[test]
fn edit_merges_patch_then_server_row() {
    let state = mounted(&[1, 2]);
    let id = RowId::from(2);
    let change = patch(json!({"status": "interview", "notes": "phone screen"}));

    let (state, effects) = update(
        state,
        Msg::EditRequested {
            id: id.clone(),
            patch: change.clone(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::UpdateRow {
            id: id.clone(),
            patch: change.clone(),
        }]
    );

    let server = Row::from_value(json!({
        "id": "2",
        "status": "interview",
        "updatedAt": "2025-04-20",
    }))
    .unwrap();
    let (state, effects) = update(
        state,
        Msg::EditCompleted {
            id: id.clone(),
            patch: change,
            result: Ok(Some(server)),
        },
    );
    assert!(effects.is_empty());

    let edited = state.page().unwrap().find(&id).unwrap();
    assert_eq!(edited.text("status").as_deref(), Some("interview"));
    assert_eq!(edited.text("notes").as_deref(), Some("phone screen"));
    assert_eq!(edited.text("updatedAt").as_deref(), Some("2025-04-20"));
    assert_eq!(edited.text("company").as_deref(), Some("DataSystems"));
    assert_eq!(ids(&state), vec!["1", "2"]);
}

#[test]
fn failed_edit_keeps_row_and_notifies() {
    let state = mounted(&[1]);
    let id = RowId::from(1);
    let change = patch(json!({"status": "offer"}));
    let (state, _) = update(
        state,
        Msg::EditRequested {
            id: id.clone(),
            patch: change.clone(),
        },
    );
    let (state, _) = update(
        state,
        Msg::EditCompleted {
            id: id.clone(),
            patch: change,
            result: Err(RemoteFailure::new("The status field is invalid.")),
        },
    );

    let row = state.page().unwrap().find(&id).unwrap();
    assert_eq!(row.text("status").as_deref(), Some("applied"));
    let notes = state.view().notifications;
    assert_eq!(notes[0].kind, NotificationKind::EditFailed);
    assert_eq!(notes[0].message, "The status field is invalid.");
}

#[test]
fn mutation_for_row_off_page_is_harmless() {
    let state = mounted(&[1, 2]);
    let (state, _) = update(state, Msg::DeleteRequested { id: RowId::from(9) });
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: RowId::from(9),
            result: Ok(()),
        },
    );
    assert_eq!(ids(&state), vec!["1", "2"]);
    assert_eq!(state.view().total_count, 2);
}

#[test]
fn notifications_are_capped_and_dismissible() {
    let mut state = mounted(&[1]);
    for attempt in 0..7 {
        let (next, _) = update(state, Msg::RefreshRequested);
        let generation = next.generation();
        let (next, _) = update(
            next,
            Msg::FetchCompleted {
                generation,
                result: Err(RemoteFailure::new(format!("failure {attempt}"))),
            },
        );
        state = next;
    }

    let notes = state.view().notifications;
    assert_eq!(notes.len(), tracker_core::MAX_NOTIFICATIONS);
    assert_eq!(notes[0].message, "failure 2");

    let (state, _) = update(state, Msg::NotificationDismissed(notes[0].id));
    assert_eq!(
        state.view().notifications.len(),
        tracker_core::MAX_NOTIFICATIONS - 1
    );
}

#[test]
fn unauthorized_after_dismissed_notice_is_reported_again() {
    let state = mounted(&[1, 2, 3]);
    let (state, effects) = update(state, Msg::RefreshRequested);
    let generation = match effects.as_slice() {
        [Effect::FetchPage { generation, .. }] => *generation,
        other => panic!("expected one fetch, got {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            generation,
            result: Err(RemoteFailure::unauthorized("Unauthenticated.")),
        },
    );
    let notice = state.view().notifications[0].id;
    let (state, _) = update(state, Msg::NotificationDismissed(notice));
    assert!(state.view().notifications.is_empty());
    assert!(state.view().session_expired);

    let (state, _) = update(state, Msg::DeleteRequested { id: RowId::from(2) });
    let (state, _) = update(
        state,
        Msg::DeleteCompleted {
            id: RowId::from(2),
            result: Err(RemoteFailure::unauthorized("Unauthenticated.")),
        },
    );

    let notes = state.view().notifications;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::SessionExpired);
    assert_eq!(ids(&state), vec!["1", "2", "3"]);
}
