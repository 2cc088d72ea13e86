use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use tracker_logging::tracker_warn;

/// Partial row sent with an edit.
pub type RowPatch = Map<String, Value>;

/// Identity of a row. The wire form may be a string or an integer; both are
/// kept as their string rendering so `1` and `"1"` name the same row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(String);

impl RowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<u64> for RowId {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

/// An opaque record mirrored from the remote API.
///
/// Only `id` is interpreted; every other field is kept as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    NotAnObject,
    MissingId,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::NotAnObject => write!(f, "row is not a JSON object"),
            RowError::MissingId => write!(f, "row has no usable id"),
        }
    }
}

impl std::error::Error for RowError {}

impl Row {
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, RowError> {
        let id = fields
            .get("id")
            .and_then(RowId::from_value)
            .ok_or(RowError::MissingId)?;
        Ok(Self { id, fields })
    }

    pub fn from_value(value: Value) -> Result<Self, RowError> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Err(RowError::NotAnObject),
        }
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// String view of a field; numbers and booleans are rendered.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Shallow merge of `patch` into this row. The identity never changes.
    pub(crate) fn merge(&mut self, patch: &RowPatch) {
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

/// One fetched page of rows plus the server's total count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultPage {
    rows: Vec<Row>,
    total_count: u64,
}

impl ResultPage {
    /// Builds a page, dropping rows whose id already appeared earlier.
    pub fn new(rows: Vec<Row>, total_count: u64) -> Self {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut unique = Vec::with_capacity(rows.len());
        for row in rows {
            if seen.insert(row.id().clone()) {
                unique.push(row);
            } else {
                tracker_warn!("Dropping duplicate row id={} from result page", row.id());
            }
        }
        Self {
            rows: unique,
            total_count,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Merges `patch`, then the authoritative server row if one came back.
    /// Returns false when the row is not on this page.
    pub(crate) fn apply_edit(&mut self, id: &RowId, patch: &RowPatch, server: Option<&Row>) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| row.id() == id) else {
            return false;
        };
        row.merge(patch);
        if let Some(server) = server {
            row.merge(&server.fields);
        }
        true
    }

    /// Removes the row and decrements the total. Returns false when the row
    /// is not on this page.
    pub(crate) fn apply_delete(&mut self, id: &RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        if self.rows.len() == before {
            return false;
        }
        self.total_count = self.total_count.saturating_sub(1);
        true
    }
}
