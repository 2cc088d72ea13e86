//! The list query and its URL projection.
//!
//! The query string surface is `page`, `limit`, `search`, repeated `status[]`
//! and repeated `source[]`. Every parameter is optional and omitted when it
//! holds its default value, so the default query serializes to an empty
//! string.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const PARAM_PAGE: &str = "page";
const PARAM_LIMIT: &str = "limit";
const PARAM_SEARCH: &str = "search";
const PARAM_STATUS: &str = "status[]";
const PARAM_SOURCE: &str = "source[]";

/// Application status of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusValue {
    Applied,
    Interview,
    Rejected,
    Offer,
    Accepted,
    Expired,
}

impl StatusValue {
    pub const ALL: [StatusValue; 6] = [
        StatusValue::Applied,
        StatusValue::Interview,
        StatusValue::Rejected,
        StatusValue::Offer,
        StatusValue::Accepted,
        StatusValue::Expired,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StatusValue::Applied => "applied",
            StatusValue::Interview => "interview",
            StatusValue::Rejected => "rejected",
            StatusValue::Offer => "offer",
            StatusValue::Accepted => "accepted",
            StatusValue::Expired => "expired",
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for StatusValue {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        StatusValue::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// Everything the user currently wants to see in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search_text: String,
    pub status_filter: BTreeSet<StatusValue>,
    pub source_filter: BTreeSet<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search_text: String::new(),
            status_filter: BTreeSet::new(),
            source_filter: BTreeSet::new(),
        }
    }
}

impl ListQuery {
    /// Parses a URL query string (with or without the leading `?`).
    ///
    /// Never fails: unparseable or out-of-range values fall back to their
    /// defaults and unknown parameters are ignored.
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = ListQuery::default();

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                PARAM_PAGE => {
                    if let Some(page) = parse_positive(&value) {
                        query.page = page;
                    }
                }
                PARAM_LIMIT => {
                    if let Some(limit) = parse_positive(&value) {
                        query.page_size = limit;
                    }
                }
                PARAM_SEARCH => {
                    query.search_text = value.trim().to_string();
                }
                PARAM_STATUS => {
                    if let Ok(status) = value.parse::<StatusValue>() {
                        query.status_filter.insert(status);
                    }
                }
                PARAM_SOURCE => {
                    let source = value.trim();
                    if !source.is_empty() {
                        query.source_filter.insert(source.to_string());
                    }
                }
                _ => {}
            }
        }

        query
    }

    /// Non-default parameters in their canonical order.
    ///
    /// The same pairs drive both the location and the remote request.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page != DEFAULT_PAGE {
            pairs.push((PARAM_PAGE, self.page.to_string()));
        }
        if self.page_size != DEFAULT_PAGE_SIZE {
            pairs.push((PARAM_LIMIT, self.page_size.to_string()));
        }
        if !self.search_text.is_empty() {
            pairs.push((PARAM_SEARCH, self.search_text.clone()));
        }
        for status in &self.status_filter {
            pairs.push((PARAM_STATUS, status.as_str().to_string()));
        }
        for source in &self.source_filter {
            pairs.push((PARAM_SOURCE, source.clone()));
        }
        pairs
    }

    /// Serializes to a query string without the leading `?`.
    ///
    /// Bracketed keys are written literally; values are form-urlencoded.
    pub fn to_query_string(&self) -> String {
        self.to_pairs()
            .into_iter()
            .map(|(key, value)| {
                let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
                format!("{key}={encoded}")
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full location for `path`; no `?` is appended for the default query.
    pub fn to_location(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }

    pub fn is_default(&self) -> bool {
        *self == ListQuery::default()
    }

    pub(crate) fn toggle_status(&mut self, status: StatusValue) {
        if !self.status_filter.remove(&status) {
            self.status_filter.insert(status);
        }
    }

    pub(crate) fn toggle_source(&mut self, source: &str) {
        if !self.source_filter.remove(source) {
            self.source_filter.insert(source.to_string());
        }
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}
