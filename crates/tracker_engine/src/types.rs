use std::fmt;

use tracker_core::{ResultPage, Row, RowId, RowPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The search quiet-period timer identified by `token` elapsed.
    SearchCommitDue { token: u64 },
    PageFetched {
        generation: u64,
        result: Result<ResultPage, ApiError>,
    },
    RowUpdated {
        id: RowId,
        patch: RowPatch,
        result: Result<Option<Row>, ApiError>,
    },
    RowDeleted {
        id: RowId,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind, FailureKind::Unauthorized(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidHeader,
    HttpStatus(u16),
    /// 401 or 403 from the API.
    Unauthorized(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidHeader => write!(f, "invalid header value"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Unauthorized(code) => write!(f, "unauthorized ({code})"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
