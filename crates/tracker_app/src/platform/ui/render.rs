use tracker_core::{DisplayState, ListViewModel, NotificationKind, RowView};

/// Path the list lives under in the dashboard.
pub const LIST_PATH: &str = "/jobs";

pub fn render(view: &ListViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let location = if view.location.is_empty() {
        LIST_PATH.to_string()
    } else {
        format!("{LIST_PATH}?{}", view.location)
    };
    lines.push(format!("Location: {location}"));

    if view.search_input.trim() != view.query.search_text {
        lines.push(format!("Search: {:?} (pending)", view.search_input));
    } else if !view.query.search_text.is_empty() {
        lines.push(format!("Search: {:?}", view.query.search_text));
    }

    let statuses: Vec<_> = view.query.status_filter.iter().map(|s| s.as_str()).collect();
    let sources: Vec<_> = view.query.source_filter.iter().map(String::as_str).collect();
    if !statuses.is_empty() || !sources.is_empty() {
        lines.push(format!(
            "Filters: status=[{}] source=[{}]",
            statuses.join(", "),
            sources.join(", ")
        ));
    }

    let pages = view
        .total_pages
        .map_or_else(|| "?".to_string(), |pages| pages.to_string());
    let mut status_line = format!(
        "Page {}/{} | {} per page | {} total",
        view.query.page, pages, view.query.page_size, view.total_count
    );
    if view.refreshing {
        status_line.push_str(" | refreshing");
    }
    lines.push(status_line);

    match view.display {
        DisplayState::Loading => lines.push("Loading job applications...".to_string()),
        DisplayState::Empty => lines.push("No job applications found.".to_string()),
        DisplayState::Populated => {
            lines.extend(
                view.rows
                    .iter()
                    .map(|row| format_row(row, view.pending_rows.contains(&row.id))),
            );
        }
    }

    if view.session_expired {
        lines.push("Session expired: sign in again, then `refresh`.".to_string());
    }

    for note in &view.notifications {
        lines.push(format!(
            "! [{}] {}: {}",
            note.id,
            notification_label(note.kind),
            note.message
        ));
    }

    lines
}

fn format_row(row: &RowView, pending: bool) -> String {
    let title = row.job_title.as_deref().unwrap_or("(untitled)");
    let mut line = format!("  #{} {}", row.id, title);
    if let Some(company) = &row.company {
        line.push_str(&format!(" @ {company}"));
    }
    if let Some(location) = &row.location {
        line.push_str(&format!(", {location}"));
    }
    let details: Vec<&str> = [&row.status, &row.source, &row.applied_on]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect();
    if !details.is_empty() {
        line.push_str(&format!(" [{}]", details.join(" | ")));
    }
    if pending {
        line.push_str(" (saving)");
    }
    line
}

fn notification_label(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::FetchFailed => "Could not load job applications",
        NotificationKind::EditFailed => "Could not update job application",
        NotificationKind::DeleteFailed => "Could not delete job application",
        NotificationKind::SessionExpired => "Signed out",
    }
}
