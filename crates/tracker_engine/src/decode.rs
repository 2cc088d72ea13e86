//! JSON bodies of the collection endpoint.

use serde_json::Value;
use tracker_core::{ResultPage, Row};

use crate::{ApiError, FailureKind};

/// Decodes `{ "data": [row, ...], "total": n }`.
///
/// A paginator envelope with `meta.total` is accepted as well; without any
/// total the number of rows is used.
pub fn decode_page(bytes: &[u8]) -> Result<ResultPage, ApiError> {
    let body: Value = serde_json::from_slice(bytes)
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;

    let data = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::new(FailureKind::Decode, "missing `data` array"))?;

    let rows = data
        .iter()
        .cloned()
        .map(Row::from_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;

    let total = body
        .get("total")
        .or_else(|| body.get("meta").and_then(|meta| meta.get("total")))
        .and_then(as_count)
        .unwrap_or(rows.len() as u64);

    Ok(ResultPage::new(rows, total))
}

/// Decodes the body of a successful update.
///
/// Returns the echoed row (bare or wrapped in `data`), or `None` for an
/// acknowledgement without one.
pub fn decode_updated_row(bytes: &[u8]) -> Option<Row> {
    let body: Value = serde_json::from_slice(bytes).ok()?;
    let candidate = match body.get("data") {
        Some(data @ Value::Object(_)) => data.clone(),
        _ => body,
    };
    Row::from_value(candidate).ok()
}

/// Pulls `message` out of an error body, if there is one.
pub fn error_message(bytes: &[u8]) -> Option<String> {
    let body: Value = serde_json::from_slice(bytes).ok()?;
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_with_total() {
        let page = decode_page(br#"{"data":[{"id":1},{"id":2}],"total":42}"#).unwrap();
        assert_eq!(page.rows().len(), 2);
        assert_eq!(page.total_count(), 42);
    }

    #[test]
    fn page_with_meta_total_or_none() {
        let page = decode_page(br#"{"data":[{"id":"a"}],"meta":{"total":"7"}}"#).unwrap();
        assert_eq!(page.total_count(), 7);

        let page = decode_page(br#"{"data":[{"id":"a"},{"id":"b"}]}"#).unwrap();
        assert_eq!(page.total_count(), 2);
    }

    #[test]
    fn page_rejects_bad_shapes() {
        assert_eq!(decode_page(b"[]").unwrap_err().kind, FailureKind::Decode);
        assert_eq!(
            decode_page(br#"{"data":[{"title":"no id"}]}"#).unwrap_err().kind,
            FailureKind::Decode
        );
        assert_eq!(decode_page(b"<html>").unwrap_err().kind, FailureKind::Decode);
    }

    #[test]
    fn updated_row_bare_wrapped_or_ack() {
        assert_eq!(
            decode_updated_row(br#"{"id":3,"status":"offer"}"#)
                .unwrap()
                .text("status")
                .as_deref(),
            Some("offer")
        );
        assert!(decode_updated_row(br#"{"data":{"id":3}}"#).is_some());
        assert!(decode_updated_row(br#"{"message":"Updated"}"#).is_none());
        assert!(decode_updated_row(b"").is_none());
    }

    #[test]
    fn message_is_extracted() {
        assert_eq!(
            error_message(br#"{"message":"Unauthenticated."}"#).as_deref(),
            Some("Unauthenticated.")
        );
        assert_eq!(error_message(br#"{"message":"  "}"#), None);
        assert_eq!(error_message(b"oops"), None);
    }
}
