use serde_json::Value;
use tracker_core::{Msg, RowId, StatusValue};

pub const USAGE: &str = "\
Commands:
  search <text>          type into the search box (sent after a short pause)
  status <value>         toggle a status filter (applied, interview, rejected, offer, accepted, expired)
  source <value>         toggle a source filter
  page <n> | next | prev change page
  limit <n>              change rows per page
  clear                  reset search, filters and paging
  refresh                fetch the current page again
  edit <id> <json>       update fields of a row, e.g. edit 4 {\"status\":\"offer\"}
  delete <id>            delete a row
  dismiss <n>            dismiss a notification
  show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(Msg),
    Show,
    Help,
    Quit,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (trimmed, ""),
    };
    let arg = rest.trim();

    let msg = match verb.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => return Ok(Command::Quit),
        // Keep inner spacing as typed; trimming happens on commit.
        "search" => Msg::SearchInputChanged(rest.to_string()),
        "status" => Msg::StatusToggled(arg.parse::<StatusValue>().map_err(|err| err.to_string())?),
        "source" => {
            if arg.is_empty() {
                return Err("source needs a value".to_string());
            }
            Msg::SourceToggled(arg.to_string())
        }
        "page" => Msg::PageSelected(parse_number(arg, "page")?),
        "next" => Msg::NextPage,
        "prev" | "previous" => Msg::PreviousPage,
        "limit" => Msg::PageSizeSelected(parse_number(arg, "limit")?),
        "clear" => Msg::ClearAll,
        "refresh" => Msg::RefreshRequested,
        "delete" => Msg::DeleteRequested { id: parse_id(arg)? },
        "edit" => {
            let (id, json) = arg
                .split_once(char::is_whitespace)
                .ok_or_else(|| "edit needs an id and a JSON object".to_string())?;
            let patch = match serde_json::from_str::<Value>(json.trim()) {
                Ok(Value::Object(patch)) if !patch.is_empty() => patch,
                Ok(_) => return Err("edit needs a non-empty JSON object".to_string()),
                Err(err) => return Err(format!("invalid JSON: {err}")),
            };
            Msg::EditRequested {
                id: parse_id(id)?,
                patch,
            }
        }
        "dismiss" => Msg::NotificationDismissed(parse_number(arg, "dismiss")?),
        other => return Err(format!("unknown command {other:?}; type `help`")),
    };
    Ok(Command::List(msg))
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.parse::<T>()
        .map_err(|_| format!("{what} needs a positive number, got {raw:?}"))
}

fn parse_id(raw: &str) -> Result<RowId, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        Err("missing row id".to_string())
    } else {
        Ok(RowId::new(raw))
    }
}
