//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. Timestamps are written by [`format_datetime`] as fixed-width
//! RFC 3339 so that `ORDER BY created_at` is chronological; the parser also
//! accepts `SQLite`'s `datetime('now')` format for hand-edited rows.

use chrono::{DateTime, SecondsFormat, Utc};
use xfer_core::enums::RequestStatus;

use crate::error::DatabaseError;

/// Format a timestamp for storage: microsecond precision, `Z` suffix.
#[must_use]
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00.000000Z"`) and `SQLite`'s
/// default format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_i64(row: &libsql::Row, idx: i32) -> Result<Option<i64>, DatabaseError> {
    Ok(row.get::<Option<i64>>(idx)?)
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Parse a stored status. Values that no longer parse read back as
/// [`RequestStatus::Unknown`] and are logged, never rejected.
#[must_use]
pub fn parse_status_lenient(s: &str) -> RequestStatus {
    s.parse().unwrap_or_else(|_| {
        tracing::warn!(status = s, "unrecognized status in store");
        RequestStatus::Unknown
    })
}

/// Parse an optional status column leniently.
#[must_use]
pub fn parse_opt_status(s: Option<&str>) -> Option<RequestStatus> {
    s.map(parse_status_lenient)
}

/// Roll back `tx` after a failed write.
///
/// A rollback failure is logged and swallowed; the caller returns its own error.
pub async fn rollback_logged(tx: libsql::Transaction) {
    if let Err(rollback_error) = tx.rollback().await {
        tracing::error!(%rollback_error, "rollback failed");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn stored_timestamps_sort_lexically() {
        let early = DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = early + chrono::Duration::microseconds(1500);

        let (a, b) = (format_datetime(early), format_datetime(later));
        assert_eq!(a, "2026-03-01T09:00:00.000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_datetime(&b).unwrap(), later);
    }

    #[test]
    fn parses_sqlite_default_format() {
        let dt = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(format_datetime(dt), "2026-02-09T14:30:00.000000Z");
    }

    #[test]
    fn rejects_garbage_datetime() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(DatabaseError::Query(_))
        ));
    }

    #[test]
    fn optional_values() {
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_json(Some("")).unwrap(), None);
        assert_eq!(
            parse_optional_json(Some(r#"{"clean":true}"#)).unwrap(),
            Some(serde_json::json!({"clean": true}))
        );
        assert!(parse_optional_json(Some("{")).is_err());
    }

    #[test]
    fn unknown_status_degrades() {
        assert_eq!(parse_status_lenient("approved"), RequestStatus::Approved);
        assert_eq!(parse_status_lenient("on_hold"), RequestStatus::Unknown);
        assert_eq!(parse_opt_status(None), None);
    }
}
