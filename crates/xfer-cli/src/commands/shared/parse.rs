use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
///
/// Hyphens are accepted in place of underscores (`pending-sme-review`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an optional JSON argument.
pub fn parse_json(raw: Option<&str>, field: &str) -> anyhow::Result<Option<serde_json::Value>> {
    raw.map(|raw| {
        serde_json::from_str(raw).map_err(|error| anyhow::anyhow!("invalid {field} JSON: {error}"))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xfer_core::enums::{AuditAction, RequestStatus, TransferVariant};

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let status: RequestStatus =
            parse_enum("pending_issm_approval", "status").expect("status should parse");
        assert_eq!(status, RequestStatus::PendingIssmApproval);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let variant: TransferVariant =
            parse_enum("high-to-low", "variant").expect("variant should parse");
        assert_eq!(variant, TransferVariant::HighToLow);

        let action: AuditAction = parse_enum("scan-recorded", "action").expect("action should parse");
        assert_eq!(action, AuditAction::ScanRecorded);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<RequestStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }

    #[test]
    fn json_argument() {
        assert_eq!(parse_json(None, "changes").unwrap(), None);
        assert_eq!(
            parse_json(Some(r#"{"clean": true}"#), "changes").unwrap(),
            Some(serde_json::json!({"clean": true}))
        );
        assert!(parse_json(Some("{"), "changes").is_err());
    }
}
